use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a logical type node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Single bit values
    Boolean,
    /// 8-bit signed integers
    Byte,
    /// 16-bit signed integers
    Short,
    /// 32-bit signed integers
    Int,
    /// 64-bit signed integers
    Long,
    /// 32-bit IEEE-754 floats
    Float,
    /// 64-bit IEEE-754 floats
    Double,
    /// UTF-8 strings
    String,
    /// Days since the Unix epoch
    Date,
    /// Ordered, named children
    Struct,
    /// Variable-length sequence of one element type
    List,
    /// Variable-length sequence of key/value pairs
    Map,
}

impl TypeKind {
    /// Returns true for kinds without children
    pub fn is_primitive(&self) -> bool {
        !matches!(self, TypeKind::Struct | TypeKind::List | TypeKind::Map)
    }

    /// Returns true for kinds whose values are integers
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            TypeKind::Byte | TypeKind::Short | TypeKind::Int | TypeKind::Long | TypeKind::Date
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Boolean => "boolean",
            TypeKind::Byte => "tinyint",
            TypeKind::Short => "smallint",
            TypeKind::Int => "int",
            TypeKind::Long => "bigint",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::String => "string",
            TypeKind::Date => "date",
            TypeKind::Struct => "struct",
            TypeKind::List => "array",
            TypeKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A node of the logical schema.
///
/// The tree is immutable once built. Composite constructors renumber their whole
/// subtree, so the outermost node always carries a consistent pre-order numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    column_id: u32,
    maximum_column_id: u32,
    kind: TypeKind,
    nullable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    field_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TypeDescription>,
}

impl TypeDescription {
    fn leaf(kind: TypeKind) -> Self {
        Self {
            column_id: 0,
            maximum_column_id: 0,
            kind,
            nullable: true,
            field_names: Vec::new(),
            children: Vec::new(),
        }
    }

    fn composite(kind: TypeKind, field_names: Vec<String>, children: Vec<TypeDescription>) -> Self {
        let mut node = Self {
            column_id: 0,
            maximum_column_id: 0,
            kind,
            nullable: true,
            field_names,
            children,
        };
        node.assign_ids(0);
        node
    }

    /// Boolean column
    pub fn boolean() -> Self {
        Self::leaf(TypeKind::Boolean)
    }

    /// 8-bit integer column
    pub fn byte() -> Self {
        Self::leaf(TypeKind::Byte)
    }

    /// 16-bit integer column
    pub fn short() -> Self {
        Self::leaf(TypeKind::Short)
    }

    /// 32-bit integer column
    pub fn int() -> Self {
        Self::leaf(TypeKind::Int)
    }

    /// 64-bit integer column
    pub fn long() -> Self {
        Self::leaf(TypeKind::Long)
    }

    /// 32-bit float column
    pub fn float() -> Self {
        Self::leaf(TypeKind::Float)
    }

    /// 64-bit float column
    pub fn double() -> Self {
        Self::leaf(TypeKind::Double)
    }

    /// UTF-8 string column
    pub fn string() -> Self {
        Self::leaf(TypeKind::String)
    }

    /// Date column (days since epoch)
    pub fn date() -> Self {
        Self::leaf(TypeKind::Date)
    }

    /// Struct column with the given named fields, in order
    pub fn struct_type<S: Into<String>>(fields: Vec<(S, TypeDescription)>) -> Self {
        let (names, children) = fields
            .into_iter()
            .map(|(name, child)| (name.into(), child))
            .unzip();
        Self::composite(TypeKind::Struct, names, children)
    }

    /// List column with the given element type
    pub fn list(element: TypeDescription) -> Self {
        Self::composite(TypeKind::List, Vec::new(), vec![element])
    }

    /// Map column with the given key and value types
    pub fn map(key: TypeDescription, value: TypeDescription) -> Self {
        Self::composite(TypeKind::Map, Vec::new(), vec![key, value])
    }

    /// Sets whether this node may contain nulls
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Pre-order numbering of this subtree starting at `next`.
    /// Returns the first id after the subtree.
    fn assign_ids(&mut self, next: u32) -> u32 {
        self.column_id = next;
        let mut next = next + 1;
        for child in &mut self.children {
            next = child.assign_ids(next);
        }
        self.maximum_column_id = next - 1;
        next
    }

    /// Column id of this node
    pub fn column_id(&self) -> u32 {
        self.column_id
    }

    /// Largest column id inside this subtree
    pub fn maximum_column_id(&self) -> u32 {
        self.maximum_column_id
    }

    /// Number of columns in this subtree, this node included
    pub fn column_count(&self) -> usize {
        (self.maximum_column_id - self.column_id + 1) as usize
    }

    /// Kind of this node
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether this node may contain nulls
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Child nodes in schema order
    pub fn children(&self) -> &[TypeDescription] {
        &self.children
    }

    /// Field names of a struct node (empty for other kinds)
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Finds the node with the given column id inside this subtree
    pub fn find_column(&self, column_id: u32) -> Option<&TypeDescription> {
        if column_id == self.column_id {
            return Some(self);
        }
        if column_id < self.column_id || column_id > self.maximum_column_id {
            return None;
        }
        self.children
            .iter()
            .find_map(|child| child.find_column(column_id))
    }
}

impl fmt::Display for TypeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TypeKind::Struct => {
                write!(f, "struct<")?;
                for (i, (name, child)) in self.field_names.iter().zip(&self.children).enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", name, child)?;
                }
                write!(f, ">")
            }
            TypeKind::List | TypeKind::Map => {
                write!(f, "{}<", self.kind)?;
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ">")
            }
            kind => write!(f, "{}", kind),
        }
    }
}
