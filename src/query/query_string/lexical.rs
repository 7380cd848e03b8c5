use super::parser::QueryStringParser;
use crate::config::ParserSettings;
use crate::models::QueryRequest;
use crate::plugin::HostParser;
use crate::query::QueryNode;
use crate::Result;

/// Name the lexical parser is registered under
pub const LEXICAL_PARSER_NAME: &str = "lucene";

/// The default query string parser, exposed as a [`HostParser`]
///
/// Request parameters `df` and `q.op` override the configured default
/// field and operator.
#[derive(Clone, Debug, Default)]
pub struct LexicalParser {
    settings: ParserSettings,
}

impl LexicalParser {
    pub fn new(settings: ParserSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }
}

impl HostParser for LexicalParser {
    fn name(&self) -> &str {
        LEXICAL_PARSER_NAME
    }

    fn parse(&self, input: &str, request: &QueryRequest) -> Result<Box<dyn QueryNode>> {
        let default_field = request
            .default_field()
            .unwrap_or(&self.settings.default_field);
        let default_operator = request
            .default_operator()
            .unwrap_or(self.settings.default_operator);

        QueryStringParser::new(input)?
            .with_default_field(default_field)
            .with_default_operator(default_operator)
            .parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{MatchOperator, QueryContext};

    fn context() -> QueryContext {
        QueryContext::builder()
            .document(1, [("size", 42.0), ("weight", 3.0)])
            .document(2, [("size", 50.0), ("weight", 42.0)])
            .build()
    }

    #[test]
    fn test_settings_default_field() {
        let parser = LexicalParser::new(ParserSettings::default().with_default_field("weight"));
        let query = parser.parse("42", &QueryRequest::new("42")).unwrap();
        assert_eq!(query.execute(&context()).unwrap().iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_request_overrides_settings() {
        let parser = LexicalParser::new(ParserSettings::default().with_default_field("weight"));
        let request = QueryRequest::new("42").with_param("df", "size");
        let query = parser.parse("42", &request).unwrap();
        assert_eq!(query.execute(&context()).unwrap().iter().collect::<Vec<_>>(), vec![0]);

        let request = QueryRequest::new("").with_param("q.op", "AND");
        let query = parser.parse("size:42 weight:42", &request).unwrap();
        assert!(query.execute(&context()).unwrap().is_empty());
    }

    #[test]
    fn test_default_operator_from_settings() {
        let parser = LexicalParser::new(
            ParserSettings::default().with_default_operator(MatchOperator::And),
        );
        let query = parser
            .parse("size:[40 TO 50] weight:[* TO 10]", &QueryRequest::default())
            .unwrap();
        assert_eq!(query.execute(&context()).unwrap().iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_name() {
        assert_eq!(LexicalParser::default().name(), LEXICAL_PARSER_NAME);
    }
}
