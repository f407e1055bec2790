//! Member tables and access-checked lookup.
//!
//! A [`MemberTable`] stands in for the set of types a program declares:
//! static methods and resolvers, each registered under its owner. A
//! [`Lookup`] is a view of that table from one caller, carrying the access
//! modes the caller may use.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use lazylink_handle::MethodHandle;
use lazylink_ir::{OwnerType, Signature};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{ResolutionError, Resolver};

bitflags! {
    /// Access modes a [`Lookup`] may use.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Access: u8 {
        /// Public members of any owner.
        const PUBLIC = 1 << 0;
        /// Private members of the caller's own type.
        const PRIVATE = 1 << 1;
    }
}

/// Visibility of a declared static method.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

struct StaticMember {
    visibility: Visibility,
    handle: MethodHandle,
}

#[derive(Default)]
struct OwnerMembers {
    /// Overloads by name; usually one.
    statics: FxHashMap<Rc<str>, SmallVec<[StaticMember; 1]>>,
    resolvers: FxHashMap<Rc<str>, Rc<dyn Resolver>>,
}

/// Declared static methods and resolvers, by owner.
#[derive(Default)]
pub struct MemberTable {
    owners: RefCell<FxHashMap<OwnerType, OwnerMembers>>,
}

impl MemberTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a static method on `owner`.
    ///
    /// A later declaration with the same name and signature replaces the
    /// earlier one.
    pub fn define_static(
        &self,
        owner: OwnerType,
        name: &str,
        visibility: Visibility,
        handle: MethodHandle,
    ) {
        let mut owners = self.owners.borrow_mut();
        let overloads = owners
            .entry(owner)
            .or_default()
            .statics
            .entry(Rc::from(name))
            .or_default();
        overloads.retain(|member| member.handle.signature() != handle.signature());
        overloads.push(StaticMember { visibility, handle });
    }

    /// Declare a resolver on `owner`.
    pub fn define_resolver(&self, owner: OwnerType, name: &str, resolver: impl Resolver + 'static) {
        self.owners
            .borrow_mut()
            .entry(owner)
            .or_default()
            .resolvers
            .insert(Rc::from(name), Rc::new(resolver));
    }

    fn find_static(
        &self,
        owner: OwnerType,
        name: &str,
        signature: &Signature,
    ) -> Result<(Visibility, MethodHandle), ResolutionError> {
        let owners = self.owners.borrow();
        let overloads = owners
            .get(&owner)
            .and_then(|members| members.statics.get(name))
            .ok_or_else(|| ResolutionError::MethodNotFound {
                owner,
                name: name.to_string(),
                signature: signature.clone(),
            })?;
        if let Some(member) = overloads
            .iter()
            .find(|member| member.handle.signature() == signature)
        {
            return Ok((member.visibility, member.handle.clone()));
        }
        match overloads.first() {
            Some(member) => Err(ResolutionError::SignatureMismatch {
                operation: format!("{owner}::{name}"),
                expected: signature.clone(),
                found: member.handle.signature().clone(),
            }),
            None => Err(ResolutionError::MethodNotFound {
                owner,
                name: name.to_string(),
                signature: signature.clone(),
            }),
        }
    }

    fn find_resolver(&self, owner: OwnerType, name: &str) -> Option<Rc<dyn Resolver>> {
        self.owners
            .borrow()
            .get(&owner)
            .and_then(|members| members.resolvers.get(name))
            .cloned()
    }
}

impl fmt::Debug for MemberTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owners = self.owners.borrow();
        let mut names: Vec<_> = owners.keys().map(|owner| owner.name()).collect();
        names.sort_unstable();
        f.debug_struct("MemberTable").field("owners", &names).finish()
    }
}

/// A caller's view of a [`MemberTable`].
#[derive(Clone)]
pub struct Lookup {
    caller: OwnerType,
    modes: Access,
    table: Rc<MemberTable>,
}

impl Lookup {
    /// Full-access lookup for code declared by `caller`.
    pub fn new(table: Rc<MemberTable>, caller: OwnerType) -> Self {
        Lookup {
            caller,
            modes: Access::all(),
            table,
        }
    }

    /// The same lookup restricted to public members.
    #[must_use]
    pub fn in_public(&self) -> Self {
        Lookup {
            modes: self.modes & Access::PUBLIC,
            ..self.clone()
        }
    }

    #[inline]
    pub fn caller(&self) -> OwnerType {
        self.caller
    }

    #[inline]
    pub fn modes(&self) -> Access {
        self.modes
    }

    #[inline]
    pub fn table(&self) -> &Rc<MemberTable> {
        &self.table
    }

    /// Find the static method `owner::name` with exactly `signature`.
    pub fn find_static(
        &self,
        owner: OwnerType,
        name: &str,
        signature: &Signature,
    ) -> Result<MethodHandle, ResolutionError> {
        let (visibility, handle) = self.table.find_static(owner, name, signature)?;
        if self.can_access(owner, visibility) {
            Ok(handle)
        } else {
            Err(ResolutionError::AccessDenied {
                caller: self.caller,
                owner,
                name: name.to_string(),
            })
        }
    }

    /// Find the resolver `owner::name`.
    pub fn find_resolver(
        &self,
        owner: OwnerType,
        name: &str,
    ) -> Result<Rc<dyn Resolver>, ResolutionError> {
        self.table
            .find_resolver(owner, name)
            .ok_or_else(|| ResolutionError::ResolverNotFound {
                owner,
                name: name.to_string(),
            })
    }

    fn can_access(&self, owner: OwnerType, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Public => self.modes.contains(Access::PUBLIC),
            Visibility::Private => self.modes.contains(Access::PRIVATE) && owner == self.caller,
        }
    }
}

impl fmt::Debug for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup")
            .field("caller", &self.caller)
            .field("modes", &self.modes)
            .finish_non_exhaustive()
    }
}
