use split_kernel::{MeshEngine, MeshIntrospect};

/// Combined trait for operations that need both mutable `MeshEngine` access
/// and read-only `MeshIntrospect` access on the same object.
///
/// Lets an operation hand a `&dyn MeshIntrospect` to a helper between two
/// mutating calls without holding `&mut` and `&` at once.
pub trait MeshBundle: MeshEngine + MeshIntrospect {
    fn as_introspect(&self) -> &dyn MeshIntrospect;
}

impl<T: MeshEngine + MeshIntrospect> MeshBundle for T {
    fn as_introspect(&self) -> &dyn MeshIntrospect {
        self
    }
}
