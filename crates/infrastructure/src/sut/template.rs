use dns_harness_domain::HarnessError;
use std::path::Path;
use tracing::debug;

pub const AUTOGENERATED_HEADER: &str = "-- Autogenerated by dns-harness\n";

/// dnsdist rule set exercised by the regression suite. Only
/// `{responder_port}` is substituted; the regex quantifier braces are
/// Lua/regex syntax and stay as they are.
const DNSDIST_TEMPLATE: &str = r#"
newServer{address="127.0.0.1:{responder_port}"}
truncateTC(true)
addAnyTCRule()
addAction(RegexRule("evil[0-9]{4,}\\.regex\\.tests\\.powerdns\\.com$"), RCodeAction(5))
mySMN = newSuffixMatchNode()
mySMN:add(newDNSName("nameAndQtype.tests.powerdns.com."))
addAction(AndRule{SuffixMatchNodeRule(mySMN), QTypeRule("TXT")}, RCodeAction(4))
block=newDNSName("powerdns.org.")
function blockFilter(remote, qname, qtype, dh)
    if(qname:isPartOf(block))
    then
        print("Blocking *.powerdns.org")
        return true
    end
    return false
end
"#;

/// Text configuration for the system under test with `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct SutConfigTemplate {
    template: String,
}

impl SutConfigTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn dnsdist_default() -> Self {
        Self::new(DNSDIST_TEMPLATE)
    }

    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let template = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Io(format!("Failed to read template {}: {}", path.display(), e))
        })?;
        Ok(Self::new(template))
    }

    /// Substitute every `{name}` whose name is in `params`. Braces that do
    /// not name a parameter are copied through untouched.
    pub fn render(&self, params: &[(&str, String)]) -> String {
        let mut body = self.template.clone();
        for (name, value) in params {
            body = body.replace(&format!("{{{}}}", name), value);
        }

        let mut rendered = String::with_capacity(AUTOGENERATED_HEADER.len() + body.len());
        rendered.push_str(AUTOGENERATED_HEADER);
        rendered.push_str(&body);
        rendered
    }

    pub fn write_to(&self, path: &Path, params: &[(&str, String)]) -> Result<(), HarnessError> {
        let rendered = self.render(params);
        std::fs::write(path, &rendered).map_err(|e| {
            HarnessError::Io(format!("Failed to write SUT config {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), bytes = rendered.len(), "SUT configuration written");
        Ok(())
    }
}

impl Default for SutConfigTemplate {
    fn default() -> Self {
        Self::dnsdist_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_injects_responder_port() {
        let rendered =
            SutConfigTemplate::dnsdist_default().render(&[("responder_port", "5350".to_string())]);

        assert!(rendered.starts_with(AUTOGENERATED_HEADER));
        assert!(rendered.contains(r#"newServer{address="127.0.0.1:5350"}"#));
        assert!(!rendered.contains("{responder_port}"));
    }

    #[test]
    fn test_render_leaves_foreign_braces_alone() {
        let rendered =
            SutConfigTemplate::dnsdist_default().render(&[("responder_port", "5350".to_string())]);

        assert!(rendered.contains("evil[0-9]{4,}"));
        assert!(rendered.contains("AndRule{SuffixMatchNodeRule(mySMN)"));
    }

    #[test]
    fn test_unknown_placeholders_survive() {
        let template = SutConfigTemplate::new("a={a} b={b}");
        assert_eq!(
            template.render(&[("a", "1".to_string())]),
            format!("{}a=1 b={{b}}", AUTOGENERATED_HEADER)
        );
    }
}
