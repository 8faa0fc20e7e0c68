use anyhow::Result;
use bincode::{
    config::{BigEndian, WithOtherEndian},
    DefaultOptions, Options,
};
use serde::{de::DeserializeOwned, Serialize};
use sled::Db as Sled;

pub struct Db {
    handle: Sled,
    encoder: WithOtherEndian<DefaultOptions, BigEndian>,
}
impl Db {
    pub fn open(path: &str) -> Result<Self> {
        let handle = sled::open(path)?;
        Ok(Self::with_handle(handle))
    }
    // in-memory database, removed on drop
    pub fn temporary() -> Result<Self> {
        let handle = sled::Config::new().temporary(true).open()?;
        Ok(Self::with_handle(handle))
    }
    fn with_handle(handle: Sled) -> Self {
        let encoder = bincode::options().with_big_endian();
        Self { handle, encoder }
    }

    pub fn next_id(&self) -> Result<u64> {
        let id = self.handle.generate_id()?;
        Ok(id)
    }
    pub async fn flush(&self) -> Result<()> {
        self.handle.flush_async().await?;
        Ok(())
    }

    // CRUD
    /// Stores `value` only if `key` is vacant. Returns `false` when the key
    /// was already taken, leaving the existing value untouched.
    pub fn insert_new<T: Serialize, K: AsRef<str>>(&self, key: K, value: &T) -> Result<bool> {
        let key = key.as_ref();
        let value = self.encoder.serialize(value)?;
        let swapped = self
            .handle
            .compare_and_swap(key, None::<&[u8]>, Some(value))?;
        Ok(swapped.is_ok())
    }
    /// Read-modify-write of a single value. Concurrent writers to the same
    /// key make the compare-and-swap fail, in which case `f` runs again on the
    /// fresh value. Returns `None` without calling `f` if the key is absent.
    pub fn modify<T, K, F>(&self, key: K, mut f: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        K: AsRef<str>,
        F: FnMut(&mut T),
    {
        let key = key.as_ref();
        loop {
            let current = match self.handle.get(key)? {
                Some(current) => current,
                None => return Ok(None),
            };
            let mut value: T = self.encoder.deserialize(&current)?;
            f(&mut value);
            let next = self.encoder.serialize(&value)?;
            if self
                .handle
                .compare_and_swap(key, Some(&current), Some(next))?
                .is_ok()
            {
                return Ok(Some(value));
            }
            tracing::trace!(key, "lost compare-and-swap race, retrying");
        }
    }
    pub fn remove<T: DeserializeOwned, K: AsRef<str>>(&self, key: K) -> Result<Option<T>> {
        let key = key.as_ref();
        let value = match self.handle.remove(key)? {
            Some(value) => value,
            None => return Ok(None),
        };
        let value = self.encoder.deserialize(&value)?;
        Ok(Some(value))
    }

    // Iterators
    pub fn iter_prefix<'a, T: DeserializeOwned + 'a>(
        &'a self,
        prefix: &str,
    ) -> Result<impl Iterator<Item = Result<(String, T)>> + 'a> {
        let iter = self.handle.scan_prefix(prefix).map(move |item| {
            let (key, value) = item?;
            let key = String::from_utf8(key.to_vec())?;
            let value = self.encoder.deserialize(&value)?;
            Ok((key, value))
        });
        Ok(iter)
    }
}

// Required Debug implementation for `Db`
impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish()
    }
}
