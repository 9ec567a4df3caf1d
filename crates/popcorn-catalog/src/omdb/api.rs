use popcorn_models::{MovieDetail, SearchResultItem};
use reqwest::{Client, Request};
use serde::Deserialize;
use tracing::{debug, warn};
use crate::error::CatalogError;

/// Placeholder OMDb uses for every missing field
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Type")]
    item_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
}

/// Search titles: `GET {base_url}?apikey=..&s=..`
pub async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResultItem>, CatalogError> {
    debug!(query = %query, "OMDb title search");
    let request = build_request(client, base_url, &[("apikey", api_key), ("s", query)])?;
    let body = get_text(client, request).await?;
    parse_search_response(&body)
}

/// Fetch one title: `GET {base_url}?apikey=..&i=..&plot=short`
pub async fn get_by_id(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: &str,
) -> Result<MovieDetail, CatalogError> {
    debug!(id = %id, "OMDb detail lookup");
    let body = get_text(client, detail_request(client, base_url, api_key, id)?).await?;
    parse_detail_response(&body)
}

fn detail_request(client: &Client, base_url: &str, api_key: &str, id: &str) -> Result<Request, CatalogError> {
    build_request(client, base_url, &[("apikey", api_key), ("i", id), ("plot", "short")])
}

fn build_request(client: &Client, base_url: &str, params: &[(&str, &str)]) -> Result<Request, CatalogError> {
    Ok(client
        .get(base_url)
        .query(params)
        .header("Accept", "application/json")
        .build()?)
}

async fn get_text(client: &Client, request: Request) -> Result<String, CatalogError> {
    let response = client.execute(request).await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        warn!("OMDb request failed: {} - {}", status, error_text);
        return Err(CatalogError::Status { status: status.as_u16() });
    }

    Ok(response.text().await?)
}

pub fn parse_search_response(body: &str) -> Result<Vec<SearchResultItem>, CatalogError> {
    let parsed: OmdbSearchResponse = serde_json::from_str(body)?;
    if !is_true(&parsed.response) {
        return Err(classify_failure(parsed.error));
    }

    Ok(parsed
        .search
        .into_iter()
        .map(|item| SearchResultItem {
            id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: normalize_text(item.poster),
            kind: item.item_type,
        })
        .collect())
}

pub fn parse_detail_response(body: &str) -> Result<MovieDetail, CatalogError> {
    let parsed: OmdbDetailResponse = serde_json::from_str(body)?;
    if !is_true(&parsed.response) {
        return Err(classify_failure(parsed.error));
    }

    Ok(MovieDetail {
        runtime_minutes: parse_runtime(&parsed.runtime),
        imdb_rating: parse_rating(&parsed.imdb_rating),
        id: parsed.imdb_id,
        title: parsed.title,
        year: parsed.year,
        poster_url: normalize_text(parsed.poster),
        plot: normalize_text(parsed.plot),
        released: normalize_text(parsed.released),
        actors: normalize_text(parsed.actors),
        director: normalize_text(parsed.director),
        genre: normalize_text(parsed.genre),
    })
}

fn is_true(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true")
}

/// OMDb answers `Response: "False"` both for "no match" and for account
/// problems; only the latter is a transport-class failure.
fn classify_failure(message: Option<String>) -> CatalogError {
    let message = message.unwrap_or_default();
    let lower = message.to_lowercase();
    if lower.contains("api key") || lower.contains("limit") {
        warn!("OMDb rejected request: {}", message);
        CatalogError::Rejected(message)
    } else {
        debug!("OMDb reported no match: {}", message);
        CatalogError::NotFound
    }
}

/// "136 min" -> 136; "N/A" or garbage -> 0
pub fn parse_runtime(runtime: &str) -> u32 {
    runtime
        .split_whitespace()
        .next()
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(0)
}

/// "8.7" -> 8.7; "N/A" or garbage -> 0.0
pub fn parse_rating(rating: &str) -> f64 {
    rating
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

fn normalize_text(value: String) -> String {
    if value == NOT_AVAILABLE {
        String::new()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_request_asks_for_short_plot() {
        let request = detail_request(&Client::new(), "https://www.omdbapi.com/", "k3y", "tt0133093").unwrap();
        let query = request.url().query().unwrap_or_default();
        assert!(query.contains("apikey=k3y"));
        assert!(query.contains("i=tt0133093"));
        assert!(query.contains("plot=short"));
    }

    const SEARCH_BODY: &str = r#"{
        "Search": [
            {"Title": "The Matrix", "Year": "1999", "imdbID": "tt0133093", "Type": "movie", "Poster": "https://m.media-amazon.com/matrix.jpg"},
            {"Title": "The Matrix Reloaded", "Year": "2003", "imdbID": "tt0234215", "Type": "movie", "Poster": "N/A"}
        ],
        "totalResults": "2",
        "Response": "True"
    }"#;

    const DETAIL_BODY: &str = r#"{
        "Title": "The Matrix", "Year": "1999", "Rated": "R", "Released": "31 Mar 1999",
        "Runtime": "136 min", "Genre": "Action, Sci-Fi", "Director": "Lana Wachowski, Lilly Wachowski",
        "Actors": "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss",
        "Plot": "When a beautiful stranger leads computer hacker Neo to a forbidding underworld...",
        "Poster": "https://m.media-amazon.com/matrix.jpg", "imdbRating": "8.7",
        "imdbID": "tt0133093", "Type": "movie", "Response": "True"
    }"#;

    #[test]
    fn test_parse_search_response() {
        let items = parse_search_response(SEARCH_BODY).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "tt0133093");
        assert_eq!(items[0].kind.as_deref(), Some("movie"));
        assert_eq!(items[1].poster_url, "");
    }

    #[test]
    fn test_search_not_found() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        assert_eq!(parse_search_response(body), Err(CatalogError::NotFound));

        let body = r#"{"Response":"False","Error":"Too many results."}"#;
        assert_eq!(parse_search_response(body), Err(CatalogError::NotFound));
    }

    #[test]
    fn test_search_rejected_key_is_not_not_found() {
        let body = r#"{"Response":"False","Error":"Invalid API key!"}"#;
        assert_eq!(
            parse_search_response(body),
            Err(CatalogError::Rejected("Invalid API key!".to_string()))
        );
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        assert!(matches!(parse_search_response("<html>"), Err(CatalogError::Decode(_))));
    }

    #[test]
    fn test_parse_detail_response() {
        let detail = parse_detail_response(DETAIL_BODY).unwrap();
        assert_eq!(detail.id, "tt0133093");
        assert_eq!(detail.runtime_minutes, 136);
        assert_eq!(detail.imdb_rating, 8.7);
        assert_eq!(detail.genre, "Action, Sci-Fi");
    }

    #[test]
    fn test_detail_incorrect_id() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        assert_eq!(parse_detail_response(body), Err(CatalogError::NotFound));
    }

    #[test]
    fn test_numeric_fields_tolerate_missing_values() {
        assert_eq!(parse_runtime("N/A"), 0);
        assert_eq!(parse_runtime("90 min"), 90);
        assert_eq!(parse_rating("N/A"), 0.0);
        assert_eq!(parse_rating(" 7.5 "), 7.5);
    }
}
