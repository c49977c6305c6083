use alloc::vec::Vec;

pub type Result<T> = anyhow::Result<T>;

/// Filesystem access used by [`crate::run`].
pub trait Os {
    fn exists(&self, path: &str) -> Result<bool>;
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
