use std::fs;
use std::path::Path;

use mkhost::os;

pub struct Os;

impl os::Os for Os {
    fn exists(&self, path: &str) -> os::Result<bool> {
        Ok(Path::new(path).exists())
    }
    fn read_file(&self, path: &str) -> os::Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }
    fn write_file(&self, path: &str, data: &[u8]) -> os::Result<()> {
        Ok(fs::write(path, data)?)
    }
}
