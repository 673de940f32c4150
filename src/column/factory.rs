use arrow::datatypes::{Date32Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use log::debug;

use crate::schema::{TypeDescription, TypeKind};
use crate::stream::StreamsFactory;
use crate::writer::{WriterConfig, WriterError};

use super::boolean::BooleanColumnWriter;
use super::byte::ByteColumnWriter;
use super::double::DoubleColumnWriter;
use super::integer::IntegerColumnWriter;
use super::list::ListColumnWriter;
use super::map::MapColumnWriter;
use super::protocol::ColumnWriter;
use super::string::StringColumnWriter;
use super::struct_writer::StructColumnWriter;

/// Builds the writer tree for `ty`.
///
/// Writers are created in pre-order, parents before children, each taking its
/// streams from `factory`. Every node records its initial position before it is
/// returned.
///
/// # Errors
///
/// Returns [`WriterError::InvalidConfig`] for an invalid `config`, and the
/// factory's error when a writer requests a stream its column type cannot own.
///
/// # Example
///
/// ```
/// use colstripe::column::build_writer;
/// use colstripe::schema::TypeDescription;
/// use colstripe::stream::MemoryStreamsFactory;
/// use colstripe::writer::WriterConfig;
///
/// let schema = TypeDescription::struct_type(vec![
///     ("id", TypeDescription::long()),
///     ("tags", TypeDescription::list(TypeDescription::string())),
/// ]);
/// let config = WriterConfig::default();
/// let mut factory = MemoryStreamsFactory::new(&config);
/// let writer = build_writer(&schema, &mut factory, &config).unwrap();
/// assert_eq!(writer.children().len(), 2);
/// ```
pub fn build_writer(
    ty: &TypeDescription,
    factory: &mut dyn StreamsFactory,
    config: &WriterConfig,
) -> Result<Box<dyn ColumnWriter>, WriterError> {
    config.validate()?;
    debug!("Building column writers for {}", ty);
    build_node(ty, factory, config)
}

pub(super) fn build_node(
    ty: &TypeDescription,
    factory: &mut dyn StreamsFactory,
    config: &WriterConfig,
) -> Result<Box<dyn ColumnWriter>, WriterError> {
    let mut writer: Box<dyn ColumnWriter> = match ty.kind() {
        TypeKind::Boolean => Box::new(BooleanColumnWriter::new(ty, factory, config)?),
        TypeKind::Byte => Box::new(ByteColumnWriter::new(ty, factory, config)?),
        TypeKind::Short => Box::new(IntegerColumnWriter::<Int16Type>::new(ty, factory, config)?),
        TypeKind::Int => Box::new(IntegerColumnWriter::<Int32Type>::new(ty, factory, config)?),
        TypeKind::Long => Box::new(IntegerColumnWriter::<Int64Type>::new(ty, factory, config)?),
        TypeKind::Date => Box::new(IntegerColumnWriter::<Date32Type>::new(ty, factory, config)?),
        TypeKind::Float => Box::new(DoubleColumnWriter::<Float32Type>::new(ty, factory, config)?),
        TypeKind::Double => Box::new(DoubleColumnWriter::<Float64Type>::new(ty, factory, config)?),
        TypeKind::String => Box::new(StringColumnWriter::new(ty, factory, config)?),
        TypeKind::Struct => Box::new(StructColumnWriter::new(ty, factory, config)?),
        TypeKind::List => Box::new(ListColumnWriter::new(ty, factory, config)?),
        TypeKind::Map => Box::new(MapColumnWriter::new(ty, factory, config)?),
    };
    writer.record_position();
    Ok(writer)
}
