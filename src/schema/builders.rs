use arrow::datatypes::{DataType, Field, Schema};

use crate::writer::WriterError;

use super::types::{TypeDescription, TypeKind};

/// Maps an Arrow data type onto the logical type kind that encodes it.
///
/// Returns [`WriterError::UnsupportedType`] for Arrow types no column writer handles.
pub fn validate_arrow_type(data_type: &DataType) -> Result<TypeKind, WriterError> {
    let kind = match data_type {
        DataType::Boolean => TypeKind::Boolean,
        DataType::Int8 => TypeKind::Byte,
        DataType::Int16 => TypeKind::Short,
        DataType::Int32 => TypeKind::Int,
        DataType::Int64 => TypeKind::Long,
        DataType::Float32 => TypeKind::Float,
        DataType::Float64 => TypeKind::Double,
        DataType::Utf8 => TypeKind::String,
        DataType::Date32 => TypeKind::Date,
        DataType::Struct(_) => TypeKind::Struct,
        DataType::List(_) => TypeKind::List,
        DataType::Map(_, _) => TypeKind::Map,
        other => return Err(WriterError::UnsupportedType(format!("{:?}", other))),
    };
    Ok(kind)
}

impl TypeDescription {
    /// Builds the logical schema for an Arrow schema.
    ///
    /// The root is a non-nullable struct whose fields are the schema's top-level
    /// fields, so record batches can be written through the root writer as a
    /// single struct array.
    ///
    /// # Example
    ///
    /// ```
    /// use arrow::datatypes::{DataType, Field, Schema};
    /// use colstripe::schema::{TypeDescription, TypeKind};
    ///
    /// let schema = Schema::new(vec![
    ///     Field::new("id", DataType::Int64, false),
    ///     Field::new("name", DataType::Utf8, true),
    /// ]);
    /// let root = TypeDescription::from_arrow_schema(&schema).unwrap();
    /// assert_eq!(root.kind(), TypeKind::Struct);
    /// assert_eq!(root.maximum_column_id(), 2);
    /// ```
    pub fn from_arrow_schema(schema: &Schema) -> Result<Self, WriterError> {
        let fields = schema
            .fields()
            .iter()
            .map(|field| Ok((field.name().clone(), Self::from_arrow_field(field)?)))
            .collect::<Result<Vec<_>, WriterError>>()?;
        Ok(Self::struct_type(fields).with_nullable(false))
    }

    /// Builds the logical type for a single Arrow field
    pub fn from_arrow_field(field: &Field) -> Result<Self, WriterError> {
        let node = match field.data_type() {
            DataType::Struct(fields) => {
                let children = fields
                    .iter()
                    .map(|child| Ok((child.name().clone(), Self::from_arrow_field(child)?)))
                    .collect::<Result<Vec<_>, WriterError>>()?;
                Self::struct_type(children)
            }
            DataType::List(element) => Self::list(Self::from_arrow_field(element)?),
            DataType::Map(entries, _) => match entries.data_type() {
                DataType::Struct(kv) if kv.len() == 2 => Self::map(
                    Self::from_arrow_field(&kv[0])?,
                    Self::from_arrow_field(&kv[1])?,
                ),
                other => {
                    return Err(WriterError::UnsupportedType(format!(
                        "map entries must be a two-field struct, found {:?}",
                        other
                    )))
                }
            },
            data_type => match validate_arrow_type(data_type)? {
                TypeKind::Boolean => Self::boolean(),
                TypeKind::Byte => Self::byte(),
                TypeKind::Short => Self::short(),
                TypeKind::Int => Self::int(),
                TypeKind::Long => Self::long(),
                TypeKind::Float => Self::float(),
                TypeKind::Double => Self::double(),
                TypeKind::String => Self::string(),
                TypeKind::Date => Self::date(),
                kind => {
                    return Err(WriterError::UnsupportedType(format!(
                        "{} without child definition",
                        kind
                    )))
                }
            },
        };
        Ok(node.with_nullable(field.is_nullable()))
    }
}
