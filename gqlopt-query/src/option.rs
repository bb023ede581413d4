//! # Query Options
//!
//! Optional, self-describing pieces attached to a GraphQL query. A query is
//! complete without any of them; each option either contributes text to the
//! rendered query (an operation name, an operation directive) or carries a
//! behavior override (a custom error decoder).
//!
//! ## Design
//! - `OptionType` is the closed set of tags consumers dispatch on
//! - `QueryOption` is the capability every option satisfies
//! - `OperationName` and `CustomErrorDecoder` are the built-in variants
//! - `operation_directive` has no built-in variant: implement `QueryOption`
//!   for your own type and tag it `OptionType::OperationDirective`

use crate::decoder::{ErrorDecoder, ReadSeek, ResponseMeta};
use crate::error::{Error, Result};
use crate::response::GraphQlErrors;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Label rendered by `CustomErrorDecoder`. Never spliced into query text.
pub const ERROR_DECODER_LABEL: &str = "error_decoder";

// ============================================================================
// Option Type
// ============================================================================

/// Identifies which variant an option is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    /// Rendered into the operation-name slot
    OperationName,
    /// Carries an `ErrorDecoder`; contributes no query text
    CustomErrorDecoder,
    /// Rendered into the operation-directive slot
    OperationDirective,
}

impl OptionType {
    /// Every recognized tag
    pub const ALL: [OptionType; 3] = [
        OptionType::OperationName,
        OptionType::CustomErrorDecoder,
        OptionType::OperationDirective,
    ];

    /// The wire name of the tag
    pub const fn as_str(&self) -> &'static str {
        match self {
            OptionType::OperationName => "operation_name",
            OptionType::CustomErrorDecoder => "custom_error_decoder",
            OptionType::OperationDirective => "operation_directive",
        }
    }

    /// Whether options of this type are spliced into the query text
    pub const fn renders_query_text(&self) -> bool {
        !matches!(self, OptionType::CustomErrorDecoder)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OptionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_option(s, format!("unrecognized option type '{}'", s))
                    .with_operation("option::parse_type")
            })
    }
}

// ============================================================================
// Option Capability
// ============================================================================

/// An optional piece of query configuration or behavior.
///
/// `Display` is the text to splice into the query, or a descriptive label
/// for options that carry behavior instead of text. Both `option_type` and
/// the rendering must be pure.
pub trait QueryOption: fmt::Display + fmt::Debug + Send + Sync {
    /// The tag consumers dispatch on
    fn option_type(&self) -> OptionType;

    /// The decoder carried by this option, if any.
    ///
    /// Only options tagged `CustomErrorDecoder` return `Some`.
    fn error_decoder(&self) -> Option<&ErrorDecoder> {
        None
    }
}

// ============================================================================
// Operation Name
// ============================================================================

/// Names the GraphQL operation. The name is not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationName {
    name: String,
}

impl OperationName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl QueryOption for OperationName {
    fn option_type(&self) -> OptionType {
        OptionType::OperationName
    }
}

/// Create the operation name option
pub fn operation_name(name: impl Into<String>) -> OperationName {
    OperationName::new(name)
}

// ============================================================================
// Custom Error Decoder
// ============================================================================

/// Replaces the built-in decoder used on failed responses.
#[derive(Clone)]
pub struct CustomErrorDecoder {
    decoder: ErrorDecoder,
}

impl CustomErrorDecoder {
    pub fn new(decoder: ErrorDecoder) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &ErrorDecoder {
        &self.decoder
    }
}

impl fmt::Debug for CustomErrorDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomErrorDecoder").finish_non_exhaustive()
    }
}

impl fmt::Display for CustomErrorDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ERROR_DECODER_LABEL)
    }
}

impl QueryOption for CustomErrorDecoder {
    fn option_type(&self) -> OptionType {
        OptionType::CustomErrorDecoder
    }

    fn error_decoder(&self) -> Option<&ErrorDecoder> {
        Some(&self.decoder)
    }
}

/// Create the custom error decoder option from a decoding function
pub fn custom_error_decoder<F>(decoder: F) -> CustomErrorDecoder
where
    F: Fn(&ResponseMeta, &mut dyn ReadSeek) -> Result<GraphQlErrors> + Send + Sync + 'static,
{
    CustomErrorDecoder::new(Arc::new(decoder))
}

// ============================================================================
// Tests
// ============================================================================
