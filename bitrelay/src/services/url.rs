use crate::errors::{AppError, AppResult};
use crate::models::ProductCode;
use url::Url;

pub const BITFLYER_BASE_URL: &str = "https://api.bitflyer.com";

/// Builds `base` + `path` + `segments` with a trailing slash and an optional
/// query string. Any path already present on `base` is replaced.
pub fn build_url(
    base: &str,
    path: &str,
    query: &[(&str, &str)],
    segments: &[&str],
) -> AppResult<String> {
    if base.is_empty() {
        return Err(AppError::Internal("base url is empty".to_string()));
    }

    let mut url = Url::parse(base)?;

    let parts: Vec<&str> = std::iter::once(path)
        .chain(segments.iter().copied())
        .flat_map(|part| part.split('/'))
        .filter(|part| !part.is_empty())
        .collect();

    let mut full_path = format!("/{}", parts.join("/"));
    if !full_path.ends_with('/') {
        full_path.push('/');
    }
    url.set_path(&full_path);

    if query.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(query);
    }

    Ok(url.to_string())
}

fn product_query(product_code: Option<ProductCode>) -> Vec<(&'static str, String)> {
    product_code
        .map(|code| vec![("product_code", code.to_string())])
        .unwrap_or_default()
}

fn with_product(
    base: &str,
    path: &str,
    product_code: Option<ProductCode>,
) -> AppResult<String> {
    let query = product_query(product_code);
    let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    build_url(base, path, &pairs, &[])
}

pub fn exchange_ticker_url(base: &str, product_code: Option<ProductCode>) -> AppResult<String> {
    with_product(base, "v1/getticker", product_code)
}

pub fn exchange_send_child_order_url(base: &str) -> AppResult<String> {
    build_url(base, "v1/me/sendchildorder", &[], &[])
}

pub fn gateway_ticker_url(base: &str, product_code: Option<ProductCode>) -> AppResult<String> {
    with_product(base, "/bitflyer/ticker", product_code)
}

pub fn gateway_health_url(base: &str) -> AppResult<String> {
    build_url(base, "/healthcheck", &[], &[])
}

pub fn store_tickers_url(base: &str) -> AppResult<String> {
    build_url(base, "/api/tickers", &[], &[])
}

pub fn store_ticker_url(base: &str, id: i64) -> AppResult<String> {
    if id <= 0 {
        return Err(AppError::BadRequest(format!("invalid ticker ID: {}", id)));
    }
    build_url(base, "/api/tickers", &[], &[&id.to_string()])
}

pub fn store_health_url(base: &str) -> AppResult<String> {
    build_url(base, "/api/healthcheck", &[], &[])
}

pub fn fast_api_health_url(base: &str) -> AppResult<String> {
    build_url(base, "/healthcheck", &[], &[])
}

/// Port of `url`, falling back to the scheme's default.
pub fn extract_port(url: &str) -> AppResult<u16> {
    if url.is_empty() {
        return Err(AppError::Internal("url is empty".to_string()));
    }
    let parsed = Url::parse(url)?;
    parsed
        .port_or_known_default()
        .ok_or_else(|| AppError::Internal(format!("no port in url: {}", url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_ticker_with_and_without_product() {
        assert_eq!(
            exchange_ticker_url(BITFLYER_BASE_URL, Some(ProductCode::BtcJpy)).unwrap(),
            "https://api.bitflyer.com/v1/getticker/?product_code=BTC_JPY"
        );
        assert_eq!(
            exchange_ticker_url(BITFLYER_BASE_URL, None).unwrap(),
            "https://api.bitflyer.com/v1/getticker/"
        );
    }

    #[test]
    fn exchange_send_child_order_path() {
        assert_eq!(
            exchange_send_child_order_url(BITFLYER_BASE_URL).unwrap(),
            "https://api.bitflyer.com/v1/me/sendchildorder/"
        );
    }

    #[test]
    fn gateway_ticker_url_has_trailing_slash() {
        assert_eq!(
            gateway_ticker_url("https://localhost:8080", Some(ProductCode::BtcJpy)).unwrap(),
            "https://localhost:8080/bitflyer/ticker/?product_code=BTC_JPY"
        );
        assert_eq!(
            gateway_ticker_url("https://localhost:8080", None).unwrap(),
            "https://localhost:8080/bitflyer/ticker/"
        );
    }

    #[test]
    fn store_urls() {
        assert_eq!(
            store_tickers_url("https://localhost:8080").unwrap(),
            "https://localhost:8080/api/tickers/"
        );
        assert_eq!(
            store_tickers_url("https://api.example.com").unwrap(),
            "https://api.example.com/api/tickers/"
        );
        assert_eq!(
            store_ticker_url("https://localhost:8080", 123).unwrap(),
            "https://localhost:8080/api/tickers/123/"
        );
        assert_eq!(
            store_health_url("http://localhost:8000").unwrap(),
            "http://localhost:8000/api/healthcheck/"
        );
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        assert!(matches!(
            store_ticker_url("https://localhost:8080", 0),
            Err(AppError::BadRequest(_))
        ));
        assert!(store_ticker_url("https://localhost:8080", -1).is_err());
    }

    #[test]
    fn build_url_edge_cases() {
        assert_eq!(
            build_url("https://localhost:8080", "", &[], &[]).unwrap(),
            "https://localhost:8080/"
        );
        assert_eq!(
            build_url("https://localhost:8080", "hoge/path", &[("hoge", "fuga")], &[]).unwrap(),
            "https://localhost:8080/hoge/path/?hoge=fuga"
        );
        assert_eq!(
            build_url("https://localhost:8080/ignored", "/api/tickers/", &[], &[]).unwrap(),
            "https://localhost:8080/api/tickers/"
        );
        assert!(build_url("", "/api", &[], &[]).is_err());
        assert!(matches!(
            build_url("not a url", "/api", &[], &[]),
            Err(AppError::Url(_))
        ));
    }

    #[test]
    fn extract_port_uses_explicit_or_default_port() {
        assert_eq!(extract_port("http://localhost:8080").unwrap(), 8080);
        assert_eq!(extract_port("http://localhost").unwrap(), 80);
        assert!(extract_port("").is_err());
    }
}
