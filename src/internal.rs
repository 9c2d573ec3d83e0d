/// Keeps traits such as [`Marker`](crate::types::id::marker::Marker)
/// from being implemented outside of this crate.
pub trait Sealed {}
