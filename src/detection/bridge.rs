use crate::models::QueryRequest;
use crate::plugin::HostParser;
use crate::query::QueryNode;
use crate::Result;
use tracing::debug;

/// Hands a synthesized expression to the host parser
///
/// The request the detector was invoked with is passed through, so request
/// level overrides (default field, default operator) still apply. Parse
/// errors are returned as the host parser reported them.
pub struct HostParserBridge<'a> {
    parser: &'a dyn HostParser,
}

impl<'a> HostParserBridge<'a> {
    pub fn new(parser: &'a dyn HostParser) -> Self {
        Self { parser }
    }

    pub fn parse(&self, expression: &str, request: &QueryRequest) -> Result<Box<dyn QueryNode>> {
        self.parser.parse(expression, request).map_err(|e| {
            debug!(
                "Parser '{}' rejected synthesized expression '{}': {}",
                self.parser.name(),
                expression,
                e
            );
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QtyError;
    use crate::query::query_string::LexicalParser;

    #[test]
    fn test_parses_expression_not_request_query() {
        let parser = LexicalParser::default();
        let bridge = HostParserBridge::new(&parser);
        let request = QueryRequest::new("42 inch tv");

        let query = bridge.parse("size:42^2.0 ", &request).unwrap();
        assert_eq!(query.query_type(), "term");
        assert_eq!(query.boost(), 2.0);
    }

    #[test]
    fn test_errors_forwarded_unchanged() {
        let parser = LexicalParser::default();
        let bridge = HostParserBridge::new(&parser);
        let request = QueryRequest::new("anything");

        let direct = parser.parse("size:[1 TO", &request).unwrap_err().to_string();
        let bridged = bridge.parse("size:[1 TO", &request).unwrap_err();

        assert!(matches!(bridged, QtyError::QueryParseError(_)));
        assert_eq!(bridged.to_string(), direct);
    }
}
