use crate::assembler::NetworkAssembler;
use crate::document::{
    self, InputDocument, OutputDocument, VariableType, load_document, store_document,
};
use crate::error::{ConvertError, DocumentError};
use crate::translator::{NodeTag, TagRegistry, convert_type};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::Map;
use std::path::Path;

/// Output settings of a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Spaces per indentation level of the written JSON.
    pub indent: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

/// Converts whole editor documents into runtime configuration documents.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    registry: TagRegistry,
    options: ConvertOptions,
}

#[derive(Debug, Clone, Default)]
pub struct ConverterBuilder {
    registry: TagRegistry,
    options: ConvertOptions,
}

impl ConverterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `editor_name` as another name for `tag` in node tables.
    pub fn with_tag_alias(mut self, editor_name: &str, tag: NodeTag) -> Self {
        self.registry = self.registry.with_alias(editor_name, tag);
        self
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.options.indent = indent;
        self
    }

    pub fn build(self) -> Converter {
        Converter {
            registry: self.registry,
            options: self.options,
        }
    }
}

impl Converter {
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Converts a parsed editor document. Either every network converts or
    /// the first error is returned.
    pub fn convert(&self, input: &InputDocument) -> Result<OutputDocument, ConvertError> {
        let mut user_node_vars = IndexMap::new();
        for var in &input.set_node_vars {
            let value_type = convert_type(&var.pin_type).ok_or_else(|| {
                ConvertError::unsupported(&var.name, "global variable type", var.pin_type.as_str())
            })?;
            match user_node_vars.entry(var.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(ConvertError::DuplicateKey {
                        kind: "global variable".to_string(),
                        key: var.name.clone(),
                        scope: "document".to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(VariableType {
                        value_type: value_type.to_string(),
                    });
                }
            }
        }

        let assembler = NetworkAssembler::new(&self.registry);
        let mut networks = IndexMap::new();
        for network in &input.networks {
            let assembled = assembler.assemble(network)?;
            match networks.entry(network.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(ConvertError::DuplicateKey {
                        kind: "network".to_string(),
                        key: network.name.clone(),
                        scope: "document".to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(assembled);
                }
            }
        }

        tracing::info!(
            networks = networks.len(),
            user_node_vars = user_node_vars.len(),
            "converted document"
        );

        Ok(OutputDocument {
            info: input.info.clone(),
            networks,
            user_node_vars,
            node_var_values: Map::new(),
        })
    }

    /// Parses, converts and pretty-prints in one step.
    pub fn convert_str(&self, json: &str) -> Result<String, DocumentError> {
        let input = document::parse_document(json)?;
        let output = self.convert(&input)?;
        document::to_pretty_json(&output, self.options.indent)
    }

    /// Loads `input`, converts it and writes the result to `output`.
    ///
    /// Nothing is written unless the whole document converts.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<OutputDocument, DocumentError> {
        let input = input.as_ref();
        tracing::info!(path = %input.display(), "loading network document");
        let document = load_document(input)?;
        let converted = self.convert(&document)?;
        store_document(output.as_ref(), &converted, self.options.indent)?;
        tracing::info!(path = %output.as_ref().display(), "wrote node configuration");
        Ok(converted)
    }
}

/// Converts `input` to `output` with the default tag registry and `options`.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<OutputDocument, DocumentError> {
    Converter::builder()
        .with_options(options.clone())
        .build()
        .convert_file(input, output)
}
