//! # gqlopt-query
//!
//! Optional pieces of a GraphQL request and how they reach the query text.
//!
//! ## Core Concepts
//! - **Option**: a tagged unit of query configuration (`QueryOption`)
//! - **OptionType**: the closed set of tags consumers dispatch on
//! - **ErrorDecoder**: a pluggable strategy for decoding failed responses
//! - **QueryBuilder**: splices text options into an operation and keeps the
//!   decoder for when the response fails
//!
//! ```rust
//! use gqlopt_query::{operation_name, QueryBuilder, QueryOption, OptionType};
//!
//! let name = operation_name("GetUser");
//! assert_eq!(name.option_type(), OptionType::OperationName);
//!
//! let built = QueryBuilder::query("{user(id:$id){name}}")
//!     .variable("id", "ID!")
//!     .option(name)
//!     .build()
//!     .unwrap();
//! assert_eq!(built.query(), "query GetUser($id:ID!){user(id:$id){name}}");
//! ```

pub mod error;
pub mod option;
pub mod decoder;
pub mod response;
pub mod query;

pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use option::{
    custom_error_decoder, operation_name, CustomErrorDecoder, OperationName, OptionType,
    QueryOption, ERROR_DECODER_LABEL,
};
pub use decoder::{
    decode_graphql_errors, decode_response, default_error_decoder, read_from_start,
    ErrorDecoder, ReadSeek, ResponseMeta,
};
pub use response::{GraphQlError, GraphQlErrors, Location, PathSegment};
pub use query::{BuiltQuery, GraphQlRequest, OperationKind, QueryBuilder, ResolvedOptions};
pub use reqwest::{header::HeaderMap, StatusCode};
