//! Cache tables and the store that owns them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lazylink_handle::VirtualMethod;
use lazylink_ir::{OwnerType, Selector, Type, Value};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Argument-to-result table for one operation of one owner.
///
/// Mutated only through [`put`](Self::put). No eviction.
pub struct CacheTable {
    owner: OwnerType,
    selector: Selector,
    entries: RefCell<FxHashMap<Value, Value>>,
}

impl CacheTable {
    /// `get` as a virtual method: `(object key) -> object`.
    pub(crate) const GET: VirtualMethod<CacheTable> = VirtualMethod {
        name: "CacheTable.get",
        params: &[Type::Object],
        ret: Type::Object,
        body: |table, args| Ok(table.get(&args[0])),
    };

    /// Store and pass through: `(object result, object key) -> object`.
    pub(crate) const UPDATE: VirtualMethod<CacheTable> = VirtualMethod {
        name: "CacheTable.update",
        params: &[Type::Object, Type::Object],
        ret: Type::Object,
        body: |table, args| {
            table.put(args[1].clone(), args[0].clone());
            Ok(args[0].clone())
        },
    };

    fn new(owner: OwnerType, selector: Selector) -> Self {
        CacheTable {
            owner,
            selector,
            entries: RefCell::new(FxHashMap::default()),
        }
    }

    #[inline]
    pub fn owner(&self) -> OwnerType {
        self.owner
    }

    #[inline]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The cached result for `key`, or `Null` if there is none.
    pub fn get(&self, key: &Value) -> Value {
        self.entries
            .borrow()
            .get(key)
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn put(&self, key: Value, value: Value) {
        trace!(selector = %self.selector, %key, "cache store");
        self.entries.borrow_mut().insert(key, value);
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl fmt::Debug for CacheTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheTable")
            .field("owner", &self.owner)
            .field("selector", &self.selector.as_str())
            .field("len", &self.len())
            .finish()
    }
}

/// Cache tables by owner, then by selector.
///
/// Tables are created on first request and never removed.
#[derive(Default)]
pub struct CacheTableStore {
    owners: RefCell<FxHashMap<OwnerType, FxHashMap<Selector, Rc<CacheTable>>>>,
}

thread_local! {
    static GLOBAL: Rc<CacheTableStore> = Rc::new(CacheTableStore::new());
}

impl CacheTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `(owner, selector)`, created empty on first request.
    ///
    /// Every later request returns the same table.
    pub fn table_for(&self, owner: OwnerType, selector: &Selector) -> Rc<CacheTable> {
        let mut owners = self.owners.borrow_mut();
        let tables = owners.entry(owner).or_default();
        if let Some(table) = tables.get(selector) {
            return Rc::clone(table);
        }
        trace!(%owner, %selector, "creating cache table");
        let table = Rc::new(CacheTable::new(owner, selector.clone()));
        tables.insert(selector.clone(), Rc::clone(&table));
        table
    }

    /// Number of tables across all owners.
    pub fn table_count(&self) -> usize {
        self.owners.borrow().values().map(FxHashMap::len).sum()
    }

    /// This thread's shared store.
    pub fn global() -> Rc<CacheTableStore> {
        GLOBAL.with(Rc::clone)
    }

    /// Run `f` with this thread's shared store.
    pub fn with_global<T>(f: impl FnOnce(&CacheTableStore) -> T) -> T {
        GLOBAL.with(|store| f(store))
    }
}

impl fmt::Debug for CacheTableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheTableStore")
            .field("tables", &self.table_count())
            .finish()
    }
}
