//! # Query Construction
//!
//! Splices query options into an operation.
//!
//! ## Rendering
//! - Operation names go between the operation keyword and the variables
//! - Operation directives go after the variables, before the selection set
//! - Error decoders contribute no text; they are kept for failed responses
//!
//! A plain `query` with no variables and no text options renders as the bare
//! selection set.

use crate::decoder::{decode_response, default_error_decoder, ErrorDecoder};
use crate::error::{Error, Result};
use crate::option::{OptionType, QueryOption};
use crate::response::GraphQlErrors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// Resolved Options
// ============================================================================

/// Options sorted into their slots
#[derive(Clone, Default)]
pub struct ResolvedOptions {
    operation_name: Option<String>,
    directives: Vec<String>,
    error_decoder: Option<ErrorDecoder>,
}

impl ResolvedOptions {
    /// Dispatch each option on its tag, in caller order.
    ///
    /// A later operation name or error decoder replaces an earlier one.
    /// An option whose tag disagrees with the decoder it carries is rejected.
    pub fn resolve(options: &[Box<dyn QueryOption>]) -> Result<Self> {
        let mut resolved = Self::default();

        for (index, option) in options.iter().enumerate() {
            let option_type = option.option_type();
            debug!(index, option_type = %option_type, "resolving query option");

            match option_type {
                OptionType::OperationName => {
                    reject_decoder(option.as_ref(), index)?;
                    if let Some(previous) = resolved.operation_name.replace(option.to_string()) {
                        warn!(%previous, "operation name supplied more than once, keeping the last");
                    }
                }
                OptionType::OperationDirective => {
                    reject_decoder(option.as_ref(), index)?;
                    resolved.directives.push(option.to_string());
                }
                OptionType::CustomErrorDecoder => {
                    let decoder = option.error_decoder().ok_or_else(|| {
                        Error::invalid_option(option_type.as_str(), "option is tagged as an error decoder but carries none")
                            .with_operation("query::resolve_options")
                            .with_context("index", index.to_string())
                    })?;
                    if resolved.error_decoder.replace(Arc::clone(decoder)).is_some() {
                        warn!("error decoder supplied more than once, keeping the last");
                    }
                }
            }
        }

        Ok(resolved)
    }

    /// The operation name, if one was supplied and is non-empty
    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    pub fn has_custom_error_decoder(&self) -> bool {
        self.error_decoder.is_some()
    }

    /// The custom decoder if one was supplied, otherwise the built-in one
    pub fn error_decoder(&self) -> ErrorDecoder {
        self.error_decoder.clone().unwrap_or_else(default_error_decoder)
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("operation_name", &self.operation_name)
            .field("directives", &self.directives)
            .field("custom_error_decoder", &self.error_decoder.is_some())
            .finish()
    }
}

fn reject_decoder(option: &dyn QueryOption, index: usize) -> Result<()> {
    if option.error_decoder().is_some() {
        let option_type = option.option_type();
        return Err(Error::invalid_option(
            option_type.as_str(),
            format!("option tagged '{}' carries an error decoder", option_type),
        )
        .with_operation("query::resolve_options")
        .with_context("index", index.to_string()));
    }
    Ok(())
}

// ============================================================================
// Operation Kind
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "query" => Ok(OperationKind::Query),
            "mutation" => Ok(OperationKind::Mutation),
            "subscription" => Ok(OperationKind::Subscription),
            other => Err(Error::invalid_argument(format!("unknown operation kind '{}'", other))
                .with_operation("query::parse_kind")),
        }
    }
}

// ============================================================================
// Query Builder
// ============================================================================

/// Builds an operation from a selection set, variables and options
#[derive(Debug, Default)]
pub struct QueryBuilder {
    kind: OperationKind,
    selection_set: String,
    variables: BTreeMap<String, String>,
    options: Vec<Box<dyn QueryOption>>,
}

impl QueryBuilder {
    pub fn new(kind: OperationKind, selection_set: impl Into<String>) -> Self {
        Self {
            kind,
            selection_set: selection_set.into(),
            ..Default::default()
        }
    }

    pub fn query(selection_set: impl Into<String>) -> Self {
        Self::new(OperationKind::Query, selection_set)
    }

    pub fn mutation(selection_set: impl Into<String>) -> Self {
        Self::new(OperationKind::Mutation, selection_set)
    }

    pub fn subscription(selection_set: impl Into<String>) -> Self {
        Self::new(OperationKind::Subscription, selection_set)
    }

    /// Declare a variable; a leading `$` on the name is optional
    pub fn variable(mut self, name: impl AsRef<str>, graphql_type: impl Into<String>) -> Self {
        let name = name.as_ref().trim_start_matches('$').to_string();
        self.variables.insert(name, graphql_type.into());
        self
    }

    pub fn option(mut self, option: impl QueryOption + 'static) -> Self {
        self.options.push(Box::new(option));
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = Box<dyn QueryOption>>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn build(&self) -> Result<BuiltQuery> {
        let selection_set = self.selection_set.trim();
        if selection_set.is_empty() {
            return Err(Error::invalid_argument("selection set is empty").with_operation("query::build"));
        }
        for (name, graphql_type) in &self.variables {
            if name.is_empty() || graphql_type.trim().is_empty() {
                return Err(Error::invalid_argument("variable needs a name and a type")
                    .with_operation("query::build")
                    .with_context("variable", name.clone()));
            }
        }

        let options = ResolvedOptions::resolve(&self.options)
            .map_err(|e| e.with_operation("query::build"))?;
        let query = render(self.kind, &options, &self.variables, selection_set);
        debug!(kind = %self.kind, operation_name = ?options.operation_name(), "built query");

        Ok(BuiltQuery { query, options })
    }
}

fn render(
    kind: OperationKind,
    options: &ResolvedOptions,
    variables: &BTreeMap<String, String>,
    selection_set: &str,
) -> String {
    let name = options.operation_name();
    if kind == OperationKind::Query && name.is_none() && variables.is_empty() && options.directives().is_empty() {
        return selection_set.to_string();
    }

    let mut out = String::from(kind.as_str());
    if let Some(name) = name {
        out.push(' ');
        out.push_str(name);
    }
    if !variables.is_empty() {
        if name.is_none() {
            out.push(' ');
        }
        let args: Vec<String> = variables
            .iter()
            .map(|(name, graphql_type)| format!("${}:{}", name, graphql_type.trim()))
            .collect();
        out.push('(');
        out.push_str(&args.join(","));
        out.push(')');
    }
    for directive in options.directives() {
        out.push(' ');
        out.push_str(directive);
    }
    out.push_str(selection_set);
    out
}

// ============================================================================
// Built Query
// ============================================================================

/// A rendered operation and the options that shaped it
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    query: String,
    options: ResolvedOptions,
}

impl BuiltQuery {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.options.operation_name()
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// The request payload; `variables` is omitted when `None`
    pub fn request(&self, variables: Option<serde_json::Value>) -> GraphQlRequest {
        GraphQlRequest {
            query: self.query.clone(),
            variables,
            operation_name: self.operation_name().map(str::to_string),
        }
    }

    /// Decode a failed response with the decoder these options selected
    pub async fn decode_error(&self, response: reqwest::Response) -> Result<GraphQlErrors> {
        decode_response(response, &self.options.error_decoder()).await
    }
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

/// JSON body of a GraphQL-over-HTTP request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    #[serde(rename = "operationName", default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{custom_error_decoder, operation_name};
    use crate::ErrorKind;

    #[derive(Debug)]
    struct Directive(&'static str);

    impl fmt::Display for Directive {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl QueryOption for Directive {
        fn option_type(&self) -> OptionType {
            OptionType::OperationDirective
        }
    }

    /// Claims to be a decoder option but carries nothing
    #[derive(Debug)]
    struct HollowDecoder;

    impl fmt::Display for HollowDecoder {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("error_decoder")
        }
    }

    impl QueryOption for HollowDecoder {
        fn option_type(&self) -> OptionType {
            OptionType::CustomErrorDecoder
        }
    }

    /// Tagged as an operation name but carries a decoder
    struct MislabeledDecoder(ErrorDecoder);

    impl fmt::Debug for MislabeledDecoder {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("MislabeledDecoder")
        }
    }

    impl fmt::Display for MislabeledDecoder {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Mislabeled")
        }
    }

    impl QueryOption for MislabeledDecoder {
        fn option_type(&self) -> OptionType {
            OptionType::OperationName
        }

        fn error_decoder(&self) -> Option<&ErrorDecoder> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_bare_query_is_unchanged() {
        let built = QueryBuilder::query("{viewer{login}}").build().unwrap();
        assert_eq!(built.query(), "{viewer{login}}");
        assert_eq!(built.operation_name(), None);
    }

    #[test]
    fn test_operation_name_slot() {
        let built = QueryBuilder::query("{user{id}}")
            .option(operation_name("GetUser"))
            .build()
            .unwrap();
        assert_eq!(built.query(), "query GetUser{user{id}}");
        assert_eq!(built.operation_name(), Some("GetUser"));
    }

    #[test]
    fn test_variables_sorted_and_directives_in_order() {
        let built = QueryBuilder::query("{user(id:$id,org:$org){name}}")
            .variable("org", "String")
            .variable("$id", "ID!")
            .option(Directive("@cached(ttl: 60)"))
            .option(operation_name("GetUser"))
            .option(Directive("@trace"))
            .build()
            .unwrap();

        assert_eq!(
            built.query(),
            "query GetUser($id:ID!,$org:String) @cached(ttl: 60) @trace{user(id:$id,org:$org){name}}"
        );
    }

    #[test]
    fn test_variables_without_name() {
        let built = QueryBuilder::query("{user(id:$id){name}}")
            .variable("id", "ID!")
            .build()
            .unwrap();
        assert_eq!(built.query(), "query ($id:ID!){user(id:$id){name}}");
    }

    #[test]
    fn test_mutation_keyword_is_always_rendered() {
        let built = QueryBuilder::mutation("{logout}").build().unwrap();
        assert_eq!(built.query(), "mutation{logout}");
    }

    #[test]
    fn test_empty_operation_name_is_omitted() {
        let built = QueryBuilder::query("{a}").option(operation_name("")).build().unwrap();
        assert_eq!(built.query(), "{a}");
    }

    #[test]
    fn test_last_operation_name_wins() {
        let built = QueryBuilder::query("{a}")
            .option(operation_name("First"))
            .option(operation_name("Second"))
            .build()
            .unwrap();
        assert_eq!(built.query(), "query Second{a}");
    }

    #[test]
    fn test_error_decoder_is_not_spliced() {
        let built = QueryBuilder::query("{a}")
            .option(custom_error_decoder(|_, _| Err(Error::decode_failed("custom"))))
            .build()
            .unwrap();

        assert_eq!(built.query(), "{a}");
        assert!(!built.query().contains("error_decoder"));
        assert!(built.options().has_custom_error_decoder());
    }

    #[test]
    fn test_default_decoder_when_none_supplied() {
        let built = QueryBuilder::query("{a}").build().unwrap();
        assert!(!built.options().has_custom_error_decoder());

        let mut body = std::io::Cursor::new(b"not json".to_vec());
        let reader: &mut dyn crate::ReadSeek = &mut body;
        let meta = crate::ResponseMeta::new(reqwest::StatusCode::BAD_GATEWAY);
        let err = (built.options().error_decoder())(&meta, reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailed);
    }

    #[test]
    fn test_hollow_decoder_fails_fast() {
        let err = QueryBuilder::query("{a}")
            .option(operation_name("A"))
            .option(HollowDecoder)
            .build()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidOption);
        assert_eq!(err.operation(), "query::build");
        assert!(err.context().contains(&("index", "1".to_string())));
    }

    #[test]
    fn test_mislabeled_decoder_fails_fast() {
        let options: Vec<Box<dyn QueryOption>> = vec![Box::new(MislabeledDecoder(default_error_decoder()))];
        let err = ResolvedOptions::resolve(&options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_invalid_arguments() {
        let err = QueryBuilder::query("   ").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = QueryBuilder::query("{a}").variable("id", " ").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = QueryBuilder::query("{a}").variable("$", "ID").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_request_payload() {
        let built = QueryBuilder::query("{user(id:$id){name}}")
            .variable("id", "ID!")
            .option(operation_name("GetUser"))
            .build()
            .unwrap();

        let payload = serde_json::to_value(built.request(Some(serde_json::json!({ "id": "42" })))).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "query": "query GetUser($id:ID!){user(id:$id){name}}",
                "variables": { "id": "42" },
                "operationName": "GetUser"
            })
        );

        let bare = serde_json::to_value(QueryBuilder::query("{a}").build().unwrap().request(None)).unwrap();
        assert_eq!(bare, serde_json::json!({ "query": "{a}" }));
    }

    #[test]
    fn test_operation_kind_parse() {
        assert_eq!("mutation".parse::<OperationKind>().unwrap(), OperationKind::Mutation);
        assert!("fragment".parse::<OperationKind>().is_err());
    }
}
