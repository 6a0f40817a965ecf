//! Route labels for spans and metrics.

use uuid::Uuid;

/// Replace UUID path segments with `{id}` so routes group in metrics.
pub(super) fn normalise_route(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_collapsed() {
        let path = "/api/orders/0190f0c2-5b8a-7cc0-8a1e-3f7f2c1d9e00";

        assert_eq!(normalise_route(path), "/api/orders/{id}");
    }

    #[test]
    fn slugs_are_kept() {
        assert_eq!(normalise_route("/api/products/blue-mug"), "/api/products/blue-mug");
        assert_eq!(normalise_route("/"), "/");
    }
}
