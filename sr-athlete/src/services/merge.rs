//! Fill-only-if-empty merge rule shared by both import reconcilers
//!
//! An incoming value is copied onto the stored one only when the stored field
//! is blank and the incoming one is not. Populated fields are never
//! overwritten.

/// Field type with a notion of "unset"
pub trait Fillable: Clone {
    fn is_blank(&self) -> bool;
}

impl Fillable for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Fillable for i64 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl Fillable for i32 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

/// Copy `incoming` into `target` if `target` is blank; true if it changed
pub fn fill_if_empty<T: Fillable>(target: &mut T, incoming: &T) -> bool {
    if target.is_blank() && !incoming.is_blank() {
        *target = incoming.clone();
        true
    } else {
        false
    }
}

/// Tracks which fields a merge pass filled
#[derive(Debug, Default)]
pub struct Merge {
    filled: Vec<&'static str>,
}

impl Merge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<T: Fillable>(&mut self, name: &'static str, target: &mut T, incoming: &T) -> &mut Self {
        if fill_if_empty(target, incoming) {
            self.filled.push(name);
        }
        self
    }

    pub fn changed(&self) -> bool {
        !self.filled.is_empty()
    }

    /// Names of the filled fields, in merge order
    pub fn filled(&self) -> &[&'static str] {
        &self.filled
    }
}
