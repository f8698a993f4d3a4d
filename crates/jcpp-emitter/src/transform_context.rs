//! Transform context: the projection layer between lowering and printing.
//!
//! The parsed body is read-only once `CodeReader::finish` returns. The
//! lowering pass records directives keyed by node, and the printer consults
//! them before emitting each node. A node may carry several directives;
//! they are applied in insertion order.

use jcpp_parser::NodeIndex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Target member-access operator for `subject.member`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberAccess {
    /// `->` on pointer-like subjects.
    Arrow,
    /// `::` on type names and static scopes.
    Scope,
    /// `.` on values.
    Dot,
}

impl MemberAccess {
    pub const fn text(self) -> &'static str {
        match self {
            MemberAccess::Arrow => "->",
            MemberAccess::Scope => "::",
            MemberAccess::Dot => ".",
        }
    }
}

/// How the printer should emit a node differently from its source form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformDirective {
    /// Primitive operand concatenated with text: wrap in the to-text helper.
    ToText,

    /// `x == null` / `x != null` where `x` is a container or array.
    ///
    /// ```text
    /// items == null   ->   items.size() == 0
    /// items != null   ->   items.size() > 0
    /// ```
    EmptinessTest { subject: NodeIndex, negated: bool },

    /// Declaration initialized with null or an empty construction: the
    /// target type's default constructor already yields an empty value.
    InitEmpty,

    /// Existing container, array or text reset by `= null` or an empty
    /// construction.
    ClearValue { text: bool },

    /// `new C(other)` copying an existing container.
    ///
    /// ```text
    /// List<T> a = new ArrayList<T>(b);   ->   List<T> a; a.addAll(b);
    /// a = new ArrayList<T>(b);           ->   a.clear(); a.addAll(b);
    /// ```
    BulkCopy {
        source: NodeIndex,
        method: &'static str,
        declare: bool,
        /// False when the source's category could not be confirmed.
        checked: bool,
    },

    /// Text built from constructor arguments: `String s(x)` / `s = String(x)`.
    ConstructFrom { call: NodeIndex, declare: bool },

    /// `T[] a = new T[n]` declared with constructor arguments, or with the
    /// brace initializer when one is given.
    ArrayConstructor {
        dims: SmallVec<[NodeIndex; 2]>,
        initializer: NodeIndex,
    },

    /// Fresh array assigned to an existing array variable; a temporary is
    /// declared on the line before.
    ArrayTemporary {
        temp: String,
        /// Source type of the fresh array, `int[]` for `new int[n]`.
        array_type: String,
        dims: SmallVec<[NodeIndex; 2]>,
    },

    /// Fresh array used as a value anywhere else: constructed inline.
    ///
    /// ```text
    /// g(new Foo[] {a, b})   ->   g(Array<sp<Foo>>({a, b}))
    /// n = new int[k].length ->   n = Array<int>(k).length
    /// ```
    ArrayValue {
        /// Source type of the fresh array.
        array_type: String,
    },

    /// `x instanceof T` as a helper call; `pointer` picks the pointer helper.
    TypeTest { pointer: bool },

    MemberAccess(MemberAccess),

    /// Field of an enclosing class.
    OuterField,

    /// Smart handle passed to a method expecting a raw pointer.
    SmartHandleGet,

    NullLiteral,

    /// `throw new T(...)` rethrows by value.
    ThrowByValue,

    /// Text the resolver could not structure, or a construct with no target
    /// counterpart: kept as source and marked for manual review.
    Unsupported,
}

#[derive(Debug, Default)]
pub struct TransformContext {
    directives: FxHashMap<NodeIndex, SmallVec<[TransformDirective; 2]>>,
}

impl TransformContext {
    pub fn new() -> Self {
        TransformContext {
            directives: FxHashMap::default(),
        }
    }

    /// Register a directive for a node. Registering the same directive
    /// twice is a no-op.
    pub fn insert(&mut self, node: NodeIndex, directive: TransformDirective) {
        let entry = self.directives.entry(node).or_default();
        if !entry.contains(&directive) {
            entry.push(directive);
        }
    }

    /// Directives registered for `node`, in insertion order.
    pub fn get(&self, node: NodeIndex) -> &[TransformDirective] {
        self.directives.get(&node).map_or(&[], |list| list.as_slice())
    }

    pub fn has_transform(&self, node: NodeIndex) -> bool {
        self.directives.contains_key(&node)
    }

    pub fn contains(&self, node: NodeIndex, directive: &TransformDirective) -> bool {
        self.get(node).contains(directive)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeIndex, &[TransformDirective])> {
        self.directives.iter().map(|(node, list)| (node, list.as_slice()))
    }

    pub fn clear(&mut self) {
        self.directives.clear();
    }

    /// Number of nodes carrying at least one directive.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
