use super::*;

fn params() -> MatchParams {
    MatchParams {
        include_search_meta: true,
        semantic: false,
        limit: 10,
        k_nearest: 5,
        num_candidates: 5000,
        best_match: false,
    }
}

#[test]
fn test_params_serialize_with_api_field_names() {
    let value = serde_json::to_value(params()).unwrap();

    assert_eq!(value["includeSearchMeta"], true);
    assert_eq!(value["semantic"], false);
    assert_eq!(value["limit"], 10);
    assert_eq!(value["kNearest"], 5);
    assert_eq!(value["numCandidates"], 5000);
    assert_eq!(value["bestMatch"], false);
}

#[test]
fn test_request_serialize_shape() {
    let mut row = JsonRow::new();
    row.insert("name".into(), "Hemoglobin".into());
    row.insert(
        "synonyms".into(),
        serde_json::json!(["Hemoglobin"]),
    );

    let request = MatchRequest {
        rows: vec![row],
        target_repo_url: "/orgs/CIEL/sources/CIEL/v2024-10-04/".into(),
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["rows"][0]["name"], "Hemoglobin");
    assert_eq!(value["rows"][0]["synonyms"][0], "Hemoglobin");
    assert_eq!(
        value["target_repo_url"],
        "/orgs/CIEL/sources/CIEL/v2024-10-04/"
    );
}

#[test]
fn test_response_deserialize_ignores_extra_fields() {
    let body = serde_json::json!([
        {
            "results": [
                {
                    "id": "718-7",
                    "display_name": "Hemoglobin [Mass/volume] in Blood",
                    "search_meta": { "search_score": 12.5, "match_type": "very_high" },
                    "concept_class": "Test"
                }
            ],
            "row": { "name": "hgb" }
        },
        { "results": [] }
    ]);

    let rows: Vec<RowMatches> = serde_json::from_value(body).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].results[0].id, "718-7");
    assert_eq!(rows[0].results[0].search_meta.search_score, 12.5);
    assert!(rows[1].results.is_empty());
}

#[test]
fn test_response_missing_fields_default() {
    let body = serde_json::json!([{ "results": [{}] }, {}]);

    let rows: Vec<RowMatches> = serde_json::from_value(body).unwrap();

    assert_eq!(rows[0].results[0].id, "");
    assert_eq!(rows[0].results[0].search_meta.search_score, 0.0);
    assert!(rows[1].results.is_empty());
}

#[test]
fn test_client_url_and_token_redaction() {
    let client = HttpMatchClient::new(
        "https://api.dev.openconceptlab.org",
        "/concepts/$match/",
        Some("secret".into()),
    )
    .unwrap();

    assert_eq!(
        client.url(),
        "https://api.dev.openconceptlab.org/concepts/$match/"
    );
    let debug = format!("{client:?}");
    assert!(!debug.contains("secret"));
}

#[test]
fn test_client_empty_base_url_rejected() {
    let result = HttpMatchClient::new("", "/concepts/$match/", None);
    assert!(matches!(result, Err(ClientError::InvalidConfig { .. })));
}

#[tokio::test]
async fn test_mock_backend_replays_and_falls_back() {
    let backend = MockMatchBackend::with_replies([
        MockReply::Results(vec![RowMatches {
            results: vec![ApiCandidate::new("718-7", "Hemoglobin", 9.0)],
        }]),
        MockReply::Fail("boom".into()),
    ]);

    let mut row = JsonRow::new();
    row.insert("name".into(), "hgb".into());
    let request = MatchRequest {
        rows: vec![row],
        target_repo_url: "/repo/".into(),
    };

    let first = backend.match_chunk(&request, &params()).await.unwrap();
    assert_eq!(first[0].results[0].id, "718-7");

    let second = backend.match_chunk(&request, &params()).await;
    assert!(matches!(second, Err(ClientError::Status { status: 500, .. })));

    let third = backend.match_chunk(&request, &params()).await.unwrap();
    assert_eq!(third.len(), 1);
    assert!(third[0].results.is_empty());

    assert_eq!(backend.calls(), 3);
}
