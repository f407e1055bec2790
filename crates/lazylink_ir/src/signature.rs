//! Callable signatures and their canonical encoding.

use std::fmt;

use smallvec::SmallVec;

use crate::Type;

/// Ordered parameter types plus a return type.
///
/// Most call sites take at most a handful of arguments, so the parameter
/// list is stored inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    params: SmallVec<[Type; 4]>,
    ret: Type,
}

impl Signature {
    /// Create a signature from parameter types and a return type.
    pub fn new(params: impl IntoIterator<Item = Type>, ret: Type) -> Self {
        Signature {
            params: params.into_iter().collect(),
            ret,
        }
    }

    /// Signature of a nullary callable.
    pub fn nullary(ret: Type) -> Self {
        Signature {
            params: SmallVec::new(),
            ret,
        }
    }

    #[inline]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    #[inline]
    pub fn param(&self, index: usize) -> Option<Type> {
        self.params.get(index).copied()
    }

    #[inline]
    pub fn ret(&self) -> Type {
        self.ret
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Canonical encoding, e.g. `(long,long,int)long`.
    ///
    /// Two signatures are equal exactly when their descriptors are equal.
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for (i, ty) in self.params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(ty.name());
        }
        out.push(')');
        out.push_str(self.ret.name());
        out
    }

    /// Copy of this signature with `types` inserted before parameter `pos`.
    ///
    /// `pos` is clamped to the arity.
    pub fn insert_params(&self, pos: usize, types: &[Type]) -> Signature {
        let pos = pos.min(self.params.len());
        let mut params = self.params.clone();
        params.insert_many(pos, types.iter().copied());
        Signature {
            params,
            ret: self.ret,
        }
    }

    /// Copy of this signature without the parameters in `start..end`.
    ///
    /// The range is clamped to the arity.
    pub fn drop_params(&self, start: usize, end: usize) -> Signature {
        let end = end.min(self.params.len());
        let start = start.min(end);
        let params = self.params[..start]
            .iter()
            .chain(&self.params[end..])
            .copied()
            .collect();
        Signature {
            params,
            ret: self.ret,
        }
    }

    /// Copy of this signature with parameter `index` replaced.
    ///
    /// Out-of-range indices leave the signature unchanged.
    pub fn change_param(&self, index: usize, ty: Type) -> Signature {
        let mut next = self.clone();
        if let Some(slot) = next.params.get_mut(index) {
            *slot = ty;
        }
        next
    }

    /// Copy of this signature with a different return type.
    pub fn change_return(&self, ret: Type) -> Signature {
        Signature {
            params: self.params.clone(),
            ret,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

#[cfg(test)]
mod tests;
