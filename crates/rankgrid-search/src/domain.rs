//! Domain canonicalization and matching for result URLs.

/// Canonicalizes a URL or bare hostname into a comparable domain token.
///
/// Given `"https://WWW.Example.com/path"`, returns `"example.com"`. Never
/// fails: input that does not parse as a URL falls back to a naive
/// lowercase/strip pass.
#[must_use]
pub fn normalize_domain(url_or_host: &str) -> String {
    let trimmed = url_or_host.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };

    let host = reqwest::Url::parse(&with_scheme)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| naive_host(trimmed));

    strip_www(host.trim_end_matches('.')).to_owned()
}

fn naive_host(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_scheme = lowered
        .split_once("://")
        .map_or(lowered.as_str(), |(_, rest)| rest);
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_owned()
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// `true` when `a` is `b` or a dot-delimited subdomain of it.
fn is_same_or_subdomain(a: &str, b: &str) -> bool {
    a == b
        || (b.contains('.')
            && a.len() > b.len()
            && a.ends_with(b)
            && a.as_bytes()[a.len() - b.len() - 1] == b'.')
}

/// Canonical match rule used by the rank trackers.
///
/// Both sides are normalized; they match when equal or when either is a
/// dot-delimited subdomain of the other. The parent side must contain a dot,
/// so a bare TLD such as `com` never matches everything beneath it.
#[must_use]
pub fn domains_match(candidate_url: &str, target_domain: &str) -> bool {
    let candidate = normalize_domain(candidate_url);
    let target = normalize_domain(target_domain);
    if candidate.is_empty() || target.is_empty() {
        return false;
    }
    is_same_or_subdomain(&candidate, &target) || is_same_or_subdomain(&target, &candidate)
}

/// Looser containment heuristic: either normalized domain contains the other
/// as a substring.
///
/// Only used to filter already-collected listings for display (for example
/// `rankgrid-cli grid --show-matches`); rank results always use
/// [`domains_match`].
#[must_use]
pub fn domains_overlap(candidate_url: &str, target_domain: &str) -> bool {
    let candidate = normalize_domain(candidate_url);
    let target = normalize_domain(target_domain);
    if candidate.is_empty() || target.is_empty() {
        return false;
    }
    candidate.contains(&target) || target.contains(&candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_scheme_path_and_www() {
        assert_eq!(
            normalize_domain("https://www.Example.com/about?x=1"),
            "example.com"
        );
    }

    #[test]
    fn normalize_accepts_bare_hosts() {
        assert_eq!(normalize_domain("Example.COM"), "example.com");
        assert_eq!(normalize_domain("www.example.com"), "example.com");
        assert_eq!(normalize_domain("shop.example.com/cart"), "shop.example.com");
    }

    #[test]
    fn normalize_drops_port_and_trailing_dot() {
        assert_eq!(normalize_domain("http://example.com:8080/"), "example.com");
        assert_eq!(normalize_domain("example.com."), "example.com");
    }

    #[test]
    fn normalize_never_fails_on_garbage() {
        assert_eq!(normalize_domain(""), "");
        assert_eq!(normalize_domain("   "), "");
        let odd = normalize_domain("http://[not a host");
        assert_eq!(odd, "[not a host");
    }

    #[test]
    fn subdomain_matches_parent_target() {
        assert!(domains_match("https://blog.example.com", "example.com"));
    }

    #[test]
    fn parent_matches_subdomain_target() {
        assert!(domains_match("https://example.com/page", "shop.example.com"));
    }

    #[test]
    fn unrelated_domains_do_not_match() {
        assert!(!domains_match("https://example.com", "other.com"));
    }

    #[test]
    fn www_prefix_is_ignored() {
        assert!(domains_match("www.example.com", "example.com"));
        assert!(domains_match("https://example.com", "https://www.example.com/"));
    }

    #[test]
    fn suffix_without_dot_boundary_does_not_match() {
        assert!(!domains_match("https://notexample.com", "example.com"));
    }

    #[test]
    fn bare_tld_never_matches() {
        assert!(!domains_match("https://com", "example.com"));
    }

    #[test]
    fn empty_sides_never_match() {
        assert!(!domains_match("", "example.com"));
        assert!(!domains_match("https://example.com", ""));
    }

    #[test]
    fn overlap_is_looser_than_match() {
        assert!(domains_overlap("https://notexample.com", "example.com"));
        assert!(!domains_match("https://notexample.com", "example.com"));
        assert!(!domains_overlap("https://example.com", "other.org"));
    }
}
