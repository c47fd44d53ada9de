//! Input types supplied by the Type Model collaborator.
//!
//! One snapshot of the catalog yields, per type, a [`TypeDecl`] plus the
//! [`Declaration`]s of its members for one framework. Declarations form a
//! closed tagged variant over the five member kinds, so a synchronizer that
//! forgets to handle a kind fails to compile rather than silently
//! misclassifying it.
//!
//! The Type Model must yield members in a stable, declaration-order-
//! preserving sequence; duplicate-resolution tie-breaks depend on it.

/// Kind of a documented type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl TypeKind {
    pub fn as_str(&self) -> &str {
        match self {
            TypeKind::Class => "Class",
            TypeKind::Struct => "Struct",
            TypeKind::Interface => "Interface",
            TypeKind::Enum => "Enum",
            TypeKind::Delegate => "Delegate",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "Class" => Some(TypeKind::Class),
            "Struct" => Some(TypeKind::Struct),
            "Interface" => Some(TypeKind::Interface),
            "Enum" => Some(TypeKind::Enum),
            "Delegate" => Some(TypeKind::Delegate),
            _ => None,
        }
    }
}

/// Kind of a documented member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Event,
    Constructor,
}

impl MemberKind {
    pub fn as_str(&self) -> &str {
        match self {
            MemberKind::Method => "Method",
            MemberKind::Property => "Property",
            MemberKind::Field => "Field",
            MemberKind::Event => "Event",
            MemberKind::Constructor => "Constructor",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "Method" => Some(MemberKind::Method),
            "Property" => Some(MemberKind::Property),
            "Field" => Some(MemberKind::Field),
            "Event" => Some(MemberKind::Event),
            "Constructor" => Some(MemberKind::Constructor),
            _ => None,
        }
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefKind {
    #[default]
    Value,
    Ref,
    Out,
    In,
}

impl RefKind {
    /// The persisted attribute value; by-value parameters carry none.
    pub fn as_attr(&self) -> Option<&str> {
        match self {
            RefKind::Value => None,
            RefKind::Ref => Some("ref"),
            RefKind::Out => Some("out"),
            RefKind::In => Some("in"),
        }
    }

    pub fn parse(attr: Option<&str>) -> Self {
        match attr {
            Some("ref") => RefKind::Ref,
            Some("out") => RefKind::Out,
            Some("in") => RefKind::In,
            _ => RefKind::Value,
        }
    }
}

/// Identity of the assembly a declaration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRef {
    pub name: String,
    pub version: String,
}

/// One parameter of a method, indexer, or constructor.
///
/// `ty` is the documented rendering for the current framework; `il_type`
/// is the IL-level identity when the two differ (`nint` renders differently
/// across frameworks but is one native-int slot). Matching keys are built
/// from the IL identity, so a slot whose rendering varies per framework
/// stays one member with parameter alternates instead of splitting in two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: String,
    pub il_type: Option<String>,
    pub ref_kind: RefKind,
}

impl ParamDecl {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            il_type: None,
            ref_kind: RefKind::Value,
        }
    }

    /// The identity used for member matching.
    pub fn identity_type(&self) -> &str {
        self.il_type.as_deref().unwrap_or(&self.ty)
    }
}

/// A generic parameter with its constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParamDecl {
    pub name: String,
    pub constraints: Vec<String>,
}

impl GenericParamDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            constraints: Vec::new(),
        }
    }
}

/// A custom attribute applied to a type, member, or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrDecl {
    pub name: String,
    pub arguments: Vec<String>,
}

impl AttrDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments: Vec::new(),
        }
    }

    /// Default rendering, used when a formatter does not override it.
    pub fn render(&self) -> String {
        if self.arguments.is_empty() {
            self.name.clone()
        } else {
            format!("{}({})", self.name, self.arguments.join(", "))
        }
    }
}

/// An interface implemented by a type, with its visibility. Non-public
/// interfaces never surface in the document, and explicit implementations
/// of their members are excluded entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    pub public: bool,
}

/// One link in a type-forwarding chain: the type relocated from one
/// assembly/version to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeForwardDecl {
    pub from_assembly: String,
    pub from_version: String,
    pub to_assembly: String,
    pub to_version: String,
}

/// A type as introspected from one framework snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub full_name: String,
    pub namespace: String,
    pub kind: TypeKind,
    pub base: Option<String>,
    pub interfaces: Vec<InterfaceDecl>,
    pub type_params: Vec<GenericParamDecl>,
    pub attributes: Vec<AttrDecl>,
    pub assembly: AssemblyRef,
    /// Forwards declared on this type itself.
    pub forwards: Vec<TypeForwardDecl>,
    /// Forwards inherited from the enclosing (nested-in) type chain.
    pub enclosing_forwards: Vec<TypeForwardDecl>,
}

/// A member as introspected from one framework snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Display name, without any explicit-interface qualification.
    pub name: String,
    /// Interface whose member this declaration explicitly implements.
    pub explicit_interface: Option<String>,
    pub attributes: Vec<AttrDecl>,
    /// Interface-member references this member implements, from the Type
    /// Model's interface map.
    pub implements: Vec<String>,
    pub assembly: AssemblyRef,
    pub kind: DeclarationKind,
}

/// The closed set of member shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    Method {
        params: Vec<ParamDecl>,
        type_params: Vec<GenericParamDecl>,
        returns: String,
    },
    Property {
        /// Indexer parameters; empty for plain properties.
        params: Vec<ParamDecl>,
        returns: String,
    },
    Field {
        returns: String,
    },
    Event {
        returns: String,
    },
    Constructor {
        params: Vec<ParamDecl>,
    },
}

impl Declaration {
    pub fn member_kind(&self) -> MemberKind {
        match &self.kind {
            DeclarationKind::Method { .. } => MemberKind::Method,
            DeclarationKind::Property { .. } => MemberKind::Property,
            DeclarationKind::Field { .. } => MemberKind::Field,
            DeclarationKind::Event { .. } => MemberKind::Event,
            DeclarationKind::Constructor { .. } => MemberKind::Constructor,
        }
    }

    pub fn params(&self) -> &[ParamDecl] {
        match &self.kind {
            DeclarationKind::Method { params, .. } => params,
            DeclarationKind::Property { params, .. } => params,
            DeclarationKind::Field { .. } => &[],
            DeclarationKind::Event { .. } => &[],
            DeclarationKind::Constructor { params } => params,
        }
    }

    pub fn type_params(&self) -> &[GenericParamDecl] {
        match &self.kind {
            DeclarationKind::Method { type_params, .. } => type_params,
            DeclarationKind::Property { .. } => &[],
            DeclarationKind::Field { .. } => &[],
            DeclarationKind::Event { .. } => &[],
            DeclarationKind::Constructor { .. } => &[],
        }
    }

    /// The member's value type: return type, property/field/event type.
    /// Constructors have none.
    pub fn return_type(&self) -> Option<&str> {
        match &self.kind {
            DeclarationKind::Method { returns, .. } => Some(returns),
            DeclarationKind::Property { returns, .. } => Some(returns),
            DeclarationKind::Field { returns } => Some(returns),
            DeclarationKind::Event { returns } => Some(returns),
            DeclarationKind::Constructor { .. } => None,
        }
    }

    /// Display name as it appears in the document: explicit implementations
    /// are qualified with their declaring interface.
    pub fn display_name(&self) -> String {
        match &self.explicit_interface {
            Some(iface) => format!("{}.{}", iface, self.name),
            None => self.name.clone(),
        }
    }
}
