use std::fs::create_dir_all;
use std::io;
use std::path::Path;

use super::setting::SettingsError;

pub fn path_to_str(path: &Path) -> Result<String, SettingsError> {
    path.to_str()
        .map(String::from)
        .ok_or_else(|| SettingsError::Path(format!("{:?}", path)))
}

pub fn mkdirp<P: AsRef<Path>>(path: P) -> io::Result<()> {
    if let Err(e) = create_dir_all(path) {
        if e.kind() != io::ErrorKind::AlreadyExists {
            return Err(e);
        }
    }
    Ok(())
}
