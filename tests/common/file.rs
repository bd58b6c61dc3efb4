use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

pub fn write_file(file_spec: FileSpec) {
    if let Some(parent) = file_spec.path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }

    std::fs::write(&file_spec.path, file_spec.content).expect("Failed to write file");
}

pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Failed to read file")
}

/// Files with random names and contents, in nested directories
pub fn write_generated_files(dir: &Path, files_count: usize) -> Vec<FileSpec> {
    use fake::Fake;
    use fake::faker::lorem::en::{Word, Words};

    (0..files_count)
        .map(|i| {
            let name = format!("{}-{i}.txt", Word().fake::<String>());
            let path = match i % 3 {
                0 => dir.join(name),
                1 => dir.join("nested").join(name),
                _ => dir.join("nested").join("deeper").join(name),
            };
            let content = Words(3..10).fake::<Vec<String>>().join(" ");

            let file_spec = FileSpec::new(path, content);
            write_file(file_spec.clone());
            file_spec
        })
        .collect()
}
