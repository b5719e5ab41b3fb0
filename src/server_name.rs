//! Server name resolution.

use crate::release::{CommandRunner, non_empty};

/// Returns the fully qualified host name of this machine.
///
/// `hostname -f` is asked first. When that fails the short host name
/// reported by the operating system is used instead.
#[must_use]
pub fn resolve_server_name(runner: &dyn CommandRunner) -> Option<String> {
    runner
        .run(&["hostname", "-f"])
        .and_then(non_empty)
        .or_else(short_hostname)
}

fn short_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .map(|name| name.to_string_lossy().into_owned())
        .and_then(non_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRunner(Option<&'static str>);

    impl CommandRunner for FakeRunner {
        fn run(&self, argv: &[&str]) -> Option<String> {
            assert_eq!(argv, ["hostname", "-f"]);
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn fully_qualified_name_preferred() {
        let name = resolve_server_name(&FakeRunner(Some("web-1.prod.example.com\n")));
        assert_eq!(name.as_deref(), Some("web-1.prod.example.com"));
    }

    #[test]
    fn falls_back_to_short_hostname() {
        let name = resolve_server_name(&FakeRunner(None));
        assert_eq!(name, short_hostname());
    }

    #[test]
    fn blank_output_falls_back() {
        let name = resolve_server_name(&FakeRunner(Some("\n")));
        assert_eq!(name, short_hostname());
    }
}
