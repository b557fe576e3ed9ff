use std::path::{Path, PathBuf};

pub const FOLIO_ROOT_ENV: &str = "FOLIO_ROOT";

pub fn sqlite_path(folio_root: &Path) -> PathBuf {
    folio_root.join("folio.db")
}

pub fn default_root(home: &Path) -> PathBuf {
    home.join(".folio")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_join_to_expected_paths() {
        let base = PathBuf::from("folio-root");
        assert_eq!(sqlite_path(&base), base.join("folio.db"));
        assert_eq!(
            default_root(Path::new("/home/me")),
            PathBuf::from("/home/me/.folio")
        );
        assert_eq!(FOLIO_ROOT_ENV, "FOLIO_ROOT");
    }
}
