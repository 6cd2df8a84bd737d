use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Generates a test for each `.s` fixture in the `test` subdirectory.
/// Subdirectories become modules.
fn main() {
    println!("cargo::rerun-if-changed=test/");

    let out_dir = std::env::var_os("OUT_DIR").unwrap();
    let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("tests.rs");
    let mut file = BufWriter::new(File::create(dest_path).unwrap());

    generate(&mut file, &Path::new(&manifest_dir).join("test"));

    file.flush().unwrap();
}

fn generate(file: &mut impl Write, dir: &Path) {
    let mut entries = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect::<Vec<PathBuf>>();
    entries.sort();

    for path in entries {
        let name = path.file_stem().unwrap().to_string_lossy().replace('-', "_");
        if path.is_dir() {
            writeln!(file, "mod {name} {{").unwrap();
            generate(file, &path);
            writeln!(file, "}}").unwrap();
        } else if path.extension().is_some_and(|ext| ext == "s") {
            writeln!(
                file,
                "#[test]\nfn {name}() -> Result<(), crate::test::TestError> {{\n    \
                 crate::test::test(include_str!({path:?}))\n}}\n"
            )
            .unwrap();
        }
    }
}
