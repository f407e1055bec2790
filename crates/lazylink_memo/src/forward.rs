//! Once-linked forward references for self-recursive bodies.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use lazylink_bind::stack::ensure_sufficient_stack;
use lazylink_handle::{InvocationError, MethodHandle};
use lazylink_ir::Signature;

use crate::LinkError;

/// A slot a raw body calls through before the handle it should call exists.
///
/// Build the raw body around [`invoker`](Self::invoker), memoize it, then
/// [`link`](Self::link) the memoized handle. Calls made before linking
/// fail with `InvocationError::Unlinked`.
///
/// A linked body that calls through its own forward holds itself alive:
/// the pair lives as long as the process, like the cache table it fills.
#[derive(Clone)]
pub struct Forward {
    name: Rc<str>,
    signature: Signature,
    slot: Rc<OnceCell<MethodHandle>>,
}

impl Forward {
    pub fn new(name: &str, signature: Signature) -> Self {
        Forward {
            name: Rc::from(name),
            signature,
            slot: Rc::new(OnceCell::new()),
        }
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn is_linked(&self) -> bool {
        self.slot.get().is_some()
    }

    /// A handle that calls whatever this forward is linked to.
    pub fn invoker(&self) -> MethodHandle {
        let slot = Rc::clone(&self.slot);
        let name = Rc::clone(&self.name);
        MethodHandle::new(
            &format!("forward({})", self.name),
            self.signature.clone(),
            move |args| match slot.get() {
                Some(target) => ensure_sufficient_stack(|| target.invoke_unchecked(args)),
                None => Err(InvocationError::Unlinked {
                    site: name.to_string(),
                    reason: "forward reference used before link".to_string(),
                }),
            },
        )
    }

    /// Point this forward at `target`. Succeeds at most once.
    pub fn link(&self, target: &MethodHandle) -> Result<(), LinkError> {
        if target.signature() != &self.signature {
            return Err(LinkError::SignatureMismatch {
                name: self.name.to_string(),
                expected: self.signature.clone(),
                found: target.signature().clone(),
            });
        }
        self.slot
            .set(target.clone())
            .map_err(|_| LinkError::AlreadyLinked {
                name: self.name.to_string(),
            })
    }
}

impl fmt::Debug for Forward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forward")
            .field("name", &self.name)
            .field("signature", &self.signature.descriptor())
            .field("linked", &self.is_linked())
            .finish()
    }
}
