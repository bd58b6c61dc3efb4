use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;

/// What `cat-file` prints about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatFileMode {
    /// Content, with trees rendered one entry per line
    #[default]
    Pretty,
    /// Object kind
    Type,
    /// Content length in bytes
    Size,
}

impl Repository {
    pub fn cat_file(&mut self, object_sha: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let object_id = ObjectId::try_parse(object_sha.to_string())?;

        match mode {
            CatFileMode::Type => {
                let raw = self.database().read(&object_id)?;
                writeln!(self.writer(), "{}", raw.object_type)?;
            }
            CatFileMode::Size => {
                let raw = self.database().read(&object_id)?;
                writeln!(self.writer(), "{}", raw.length)?;
            }
            CatFileMode::Pretty => match self.database().parse_object(&object_id)? {
                // blob bytes go out untouched, binary content included
                ObjectBox::Blob(blob) => self.writer().write_all(blob.content())?,
                ObjectBox::Tree(tree) => {
                    for entry in tree.entries() {
                        writeln!(
                            self.writer(),
                            "{} {} {}\t{}",
                            entry.mode,
                            entry.object_type(),
                            entry.oid,
                            entry.name
                        )?;
                    }
                }
                object @ ObjectBox::Commit(_) => write!(self.writer(), "{}", object.display())?,
            },
        }

        Ok(())
    }
}
