use bytes::Bytes;

/// File kept byte for byte, either outside of any category or one that
/// could not be decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct UnknownFile {
    pub data: Bytes,
}

impl UnknownFile {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}
