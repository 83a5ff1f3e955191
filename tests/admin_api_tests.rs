use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use loan_document_desk::client::{AdminApiClient, ClientError, DocumentClient};
use loan_document_desk::documents::{DocumentKind, DocumentPayload, DocumentRequest};

fn client_for(server: &MockServer, token: Option<&str>) -> AdminApiClient {
    AdminApiClient::with_http_client(
        reqwest::Client::new(),
        &server.uri(),
        token.map(str::to_string),
    )
}

#[tokio::test]
async fn test_fetch_kfs_decodes_payload_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/kfs/42"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "company": { "name": "Lendwise Finance" },
                "loan": { "id": 42, "applicationNumber": "APP42" },
                "borrower": { "name": "Ravi Kumar", "email": "ravi@example.com" },
                "interest": { "annualRate": 36.5 },
                "generatedAt": "2026-10-18T10:00:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("secret"));
    let envelope = api
        .fetch_document(DocumentKind::Kfs, &DocumentRequest::new(42))
        .await
        .unwrap();

    assert!(envelope.success);
    match envelope.data.unwrap() {
        DocumentPayload::Kfs(doc) => {
            assert_eq!(doc.loan.application_number.as_deref(), Some("APP42"));
            assert_eq!(doc.interest.annual_rate, Some(36.5));
        }
        other => panic!("unexpected payload {:?}", other.kind()),
    }
}

#[tokio::test]
async fn test_fetch_accepts_loosely_typed_backend_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/loan-agreement/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "company": { "name": "Lendwise Finance" },
                "loan": { "id": 77, "applicationNumber": 2024077, "loanAmount": "15000.00" },
                "borrower": { "name": null, "email": "meera@example.com" },
                "terms": { "sanctionedAmount": "15000.00", "tenureDays": 30, "interestRate": "0.10" },
                "clauses": null,
                "generatedAt": "2026-10-18 10:00:00"
            }
        })))
        .mount(&server)
        .await;

    let envelope = client_for(&server, None)
        .fetch_document(DocumentKind::LoanAgreement, &DocumentRequest::new(77))
        .await
        .unwrap();

    assert!(envelope.success);
    let payload = envelope.data.unwrap();
    assert_eq!(payload.loan().application_number.as_deref(), Some("2024077"));
    assert_eq!(payload.loan().loan_amount, Some(15000.0));
    assert_eq!(payload.borrower_email(), Some("meera@example.com"));
    assert!(payload.generated_at().is_some());
}

#[tokio::test]
async fn test_fetch_extension_letter_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/extension-letter/9"))
        .and(query_param("transactionId", "TXN-1"))
        .and(query_param("extensionNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "extension": { "extensionNumber": 2 } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = DocumentRequest {
        loan_id: 9,
        transaction_id: Some("TXN-1".to_string()),
        extension_number: Some(2),
    };
    let envelope = client_for(&server, None)
        .fetch_document(DocumentKind::ExtensionLetter, &request)
        .await
        .unwrap();

    assert_eq!(envelope.data.unwrap().kind(), DocumentKind::ExtensionLetter);
}

#[tokio::test]
async fn test_fetch_failure_envelope_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/noc/5"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Loan is not closed yet"
        })))
        .mount(&server)
        .await;

    let envelope = client_for(&server, None)
        .fetch_document(DocumentKind::Noc, &DocumentRequest::new(5))
        .await
        .unwrap();

    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.message.as_deref(), Some("Loan is not closed yet"));
}

#[tokio::test]
async fn test_fetch_non_json_error_becomes_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/kfs/5"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .fetch_document(DocumentKind::Kfs, &DocumentRequest::new(5))
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "KFS request failed with status 502");
        }
        other => panic!("unexpected error {}", other),
    }
}

#[tokio::test]
async fn test_generate_pdf_posts_html_and_returns_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/loan-agreement/11/generate-pdf"))
        .and(body_partial_json(json!({ "htmlContent": "<html>doc</html>" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.7".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pdf = client_for(&server, None)
        .generate_pdf(
            DocumentKind::LoanAgreement,
            &DocumentRequest::new(11),
            "<html>doc</html>",
        )
        .await
        .unwrap();

    assert_eq!(pdf, b"%PDF-1.7");
}

#[tokio::test]
async fn test_generate_pdf_error_status_is_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/kfs/11/generate-pdf"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Chromium failed to start"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .generate_pdf(DocumentKind::Kfs, &DocumentRequest::new(11), "<html></html>")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Chromium failed to start");
}

#[tokio::test]
async fn test_email_pdf_posts_recipient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/kfs/3/email-pdf"))
        .and(body_partial_json(json!({
            "recipientEmail": "ravi@example.com",
            "recipientName": "Ravi Kumar"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "recipientEmail": "ravi@example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = client_for(&server, None)
        .email_pdf(DocumentKind::Kfs, 3, "<html></html>", "ravi@example.com", "Ravi Kumar")
        .await
        .unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.data.unwrap().recipient_email, "ravi@example.com");
}

#[tokio::test]
async fn test_email_pdf_unsupported_kind_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .email_pdf(DocumentKind::Noc, 3, "<html></html>", "a@b.in", "A")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Unsupported {
            kind: DocumentKind::Noc,
            ..
        }
    ));
}
