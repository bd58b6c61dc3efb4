//! Commit object
//!
//! Commits record a snapshot of the repository: the tree object holding the
//! directory state, at most one parent commit, identity metadata and a message.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>        (absent for the initial commit)
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Only the `tree` line is mandatory when decoding; unknown header lines are
//! skipped.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;

const DEFAULT_AUTHOR_NAME: &str = "mingit user";
const DEFAULT_AUTHOR_EMAIL: &str = "user@example.com";

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author with the current timestamp
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Load author information from environment variables
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL, and optionally GIT_AUTHOR_DATE
    /// (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`). Unset identity falls back to the
    /// default local user; an unset or unparsable date means now.
    pub fn load_from_env() -> Self {
        let name =
            std::env::var("GIT_AUTHOR_NAME").unwrap_or_else(|_| DEFAULT_AUTHOR_NAME.to_string());
        let email =
            std::env::var("GIT_AUTHOR_EMAIL").unwrap_or_else(|_| DEFAULT_AUTHOR_EMAIL.to_string());
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Author::new_with_timestamp(name, email, ts),
            None => Author::new(name, email),
        }
    }

    /// "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// "Name <email> timestamp timezone", as stored in commits
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    fn parse_offset(timezone: &str) -> Option<FixedOffset> {
        let (sign, digits) = match timezone.split_at_checked(1)? {
            ("+", digits) => (1, digits),
            ("-", digits) => (-1, digits),
            _ => return None,
        };
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let hours = digits[..2].parse::<i32>().ok()?;
        let minutes = digits[2..].parse::<i32>().ok()?;
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
    }
}

impl Default for Author {
    fn default() -> Self {
        Author::new(
            DEFAULT_AUTHOR_NAME.to_string(),
            DEFAULT_AUTHOR_EMAIL.to_string(),
        )
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        // Format: "name <email> timestamp timezone"
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(Error::corrupt(format!("invalid author line {value:?}")));
        }

        let offset = Self::parse_offset(parts[0])
            .ok_or_else(|| Error::corrupt(format!("invalid timezone {:?}", parts[0])))?;
        let timestamp = parts[1]
            .parse::<i64>()
            .ok()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .ok_or_else(|| Error::corrupt(format!("invalid timestamp {:?}", parts[1])))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| Error::corrupt("invalid author format: missing '<'"))?;
        let email_end = name_email_part
            .rfind('>')
            .filter(|end| *end > email_start)
            .ok_or_else(|| Error::corrupt("invalid author format: missing '>'"))?;

        Ok(Author {
            name: name_email_part[..email_start].trim().to_string(),
            email: name_email_part[email_start + 1..email_end].to_string(),
            timestamp: timestamp.with_timezone(&offset),
        })
    }
}

/// Single-parent commit
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Option<Author>,
    committer: Option<Author>,
    message: String,
}

impl Commit {
    /// Create a new commit; the author is also recorded as committer
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author: Some(author.clone()),
            committer: Some(author),
            message,
        }
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    pub fn committer(&self) -> Option<&Author> {
        self.committer.as_ref()
    }

    fn parse_oid_field(value: &str, field: &str) -> Result<ObjectId> {
        ObjectId::try_parse(value.to_string())
            .map_err(|_| Error::corrupt(format!("invalid {field} digest {value:?}")))
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];

        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        if let Some(author) = &self.author {
            lines.push(format!("author {}", author.display()));
        }
        if let Some(committer) = &self.committer {
            lines.push(format!("committer {}", committer.display()));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        let mut content = lines.join("\n");
        content.push('\n');

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        let content = String::from_utf8(content)
            .map_err(|_| Error::corrupt("commit object is not valid UTF-8"))?;

        let (headers, message) = match content.split_once("\n\n") {
            Some((headers, body)) => (headers, body.strip_suffix('\n').unwrap_or(body)),
            None => (content.trim_end_matches('\n'), ""),
        };
        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| Error::corrupt("commit object is missing its tree line"))?;
        let tree_oid = Self::parse_oid_field(tree_oid, "tree")?;

        let mut parent = None;
        let mut author = None;
        let mut committer = None;

        for line in lines {
            if let Some(parent_oid) = line.strip_prefix("parent ") {
                if parent.is_some() {
                    return Err(Error::corrupt("commit object has more than one parent"));
                }
                parent = Some(Self::parse_oid_field(parent_oid, "parent")?);
            } else if let Some(value) = line.strip_prefix("author ") {
                author = Some(Author::try_from(value)?);
            } else if let Some(value) = line.strip_prefix("committer ") {
                committer = Some(Author::try_from(value)?);
            }
        }

        Ok(Commit {
            parent,
            tree_oid,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.serialize().unwrap_or_default()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    const TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
    const OTHER_TREE: &str = "a9b1a7a3a9d1a8c1e2d9b05bdcf1c9b2fa0e5c71";
    const PARENT: &str = "557db03de997c86a4a028e1ebd3a1ceb225be238";

    fn oid(hex: &str) -> ObjectId {
        ObjectId::try_parse(hex.to_string()).unwrap()
    }

    #[fixture]
    fn author() -> Author {
        let timestamp = DateTime::parse_from_str("2024-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z")
            .unwrap();
        Author::new_with_timestamp("Ada Lovelace".to_string(), "ada@example.com".to_string(), timestamp)
    }

    #[rstest]
    fn root_commit_encoding(author: Author) {
        let commit = Commit::new(None, oid(TREE), author, "First!".to_string());

        let content = String::from_utf8(commit.serialize().unwrap().to_vec()).unwrap();

        assert_eq!(
            content,
            format!(
                "tree {TREE}\nauthor Ada Lovelace <ada@example.com> 1704103200 +0200\n\
                 committer Ada Lovelace <ada@example.com> 1704103200 +0200\n\nFirst!\n"
            )
        );
    }

    #[rstest]
    #[case("")]
    #[case("Update")]
    #[case("Subject\n\nBody with\n\nblank lines\n")]
    fn decoding_restores_all_fields(author: Author, #[case] message: &str) {
        let commit = Commit::new(Some(oid(PARENT)), oid(TREE), author, message.to_string());

        let decoded = Commit::deserialize(Cursor::new(commit.serialize().unwrap())).unwrap();

        assert_eq!(decoded, commit);
        assert_eq!(decoded.object_id().unwrap(), commit.object_id().unwrap());
    }

    #[test]
    fn minimal_encoding_without_identity_decodes() {
        let raw = format!("tree {TREE}\nparent {PARENT}\n\nhello\n");

        let commit = Commit::deserialize(Cursor::new(raw)).unwrap();

        assert_eq!(commit.tree_oid(), &oid(TREE));
        assert_eq!(commit.parent(), Some(&oid(PARENT)));
        assert_eq!(commit.author(), None);
        assert_eq!(commit.message(), "hello");
    }

    #[rstest]
    #[case(format!("parent {PARENT}\n\nno tree\n"))]
    #[case("tree 1234\n\nshort digest\n".to_string())]
    #[case(format!("tree {TREE}\nparent xyz\n\nbad parent\n"))]
    #[case(format!("tree {TREE}\nparent {PARENT}\nparent {PARENT}\n\nmerge\n"))]
    #[case(format!("tree {TREE}\nauthor nobody\n\nbad author\n"))]
    fn malformed_commits_are_corrupt(#[case] raw: String) {
        let result = Commit::deserialize(Cursor::new(raw));

        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[rstest]
    fn digest_changes_with_tree_parent_and_message(author: Author) {
        let base = Commit::new(None, oid(TREE), author.clone(), "msg".to_string());
        let other_tree = Commit::new(None, oid(OTHER_TREE), author.clone(), "msg".to_string());
        let with_parent = Commit::new(Some(oid(PARENT)), oid(TREE), author.clone(), "msg".to_string());
        let other_message = Commit::new(None, oid(TREE), author.clone(), "msg2".to_string());
        let same = Commit::new(None, oid(TREE), author, "msg".to_string());

        let base_id = base.object_id().unwrap();
        assert_eq!(base_id, same.object_id().unwrap());
        assert_ne!(base_id, other_tree.object_id().unwrap());
        assert_ne!(base_id, with_parent.object_id().unwrap());
        assert_ne!(base_id, other_message.object_id().unwrap());
    }

    #[rstest]
    fn author_line_keeps_its_timezone(author: Author) {
        let parsed = Author::try_from(author.display().as_str()).unwrap();

        assert_eq!(parsed.display(), author.display());
        assert_eq!(parsed.display_name(), "Ada Lovelace <ada@example.com>");
    }
}
