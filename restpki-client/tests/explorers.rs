//! Opening signatures, authentication and visual presets against a mock server

use restpki_client::{
    CadesSignatureExplorer, ClientConfig, DigestAlgorithm, PadesSignatureExplorer, RestError,
    RestPkiClient, SignatureExplorer, StandardSecurityContexts, StandardSignaturePolicies,
    StandardSignaturePolicyCatalog,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RestPkiClient {
    RestPkiClient::new(ClientConfig::new(server.uri(), "t")).unwrap()
}

fn signer_json() -> serde_json::Value {
    json!({
        "messageDigest": {"algorithm": "SHA256", "value": "AQID"},
        "signature": {"algorithm": {"name": "SHA256WithRSA", "oid": "1.2.840.113549.1.1.11"}},
        "certificate": {"subjectName": {"commonName": "Alan Turing"}},
        "signingTime": "2016-05-04T17:35:03-03:00",
        "validationResults": {
            "errors": [],
            "warnings": [],
            "passedChecks": [{"type": "SignatureValid", "message": "Signature is valid"}]
        }
    })
}

#[tokio::test]
async fn test_open_pades() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Api/PadesSignatures/Open"))
        .and(body_partial_json(json!({
            "validate": true,
            "defaultSignaturePolicyId": "78d20b33-014d-440e-ad07-929f05d00cdf",
            "securityContextId": "201856ce-273c-4058-a872-8937bd547d36",
            "dataHashes": null,
            "file": {"content": "JVBERg==", "mimeType": "application/pdf", "blobId": null}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signers": [signer_json()]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let signature = PadesSignatureExplorer::new(&client)
        .with_signature_file(b"%PDF".to_vec())
        .with_validate(true)
        .with_default_signature_policy(StandardSignaturePolicies::PADES_BASIC)
        .with_security_context(StandardSecurityContexts::PKI_BRAZIL)
        .open()
        .await
        .unwrap();

    assert_eq!(signature.signers.len(), 1);
    let signer = &signature.signers[0];
    assert!(!signer.is_document_timestamp);
    assert_eq!(signer.message_digest.algorithm, DigestAlgorithm::Sha256);
    assert!(signer.is_valid());
    assert_eq!(
        signer.certificate.as_ref().unwrap().subject_common_name(),
        "Alan Turing"
    );
}

#[tokio::test]
async fn test_open_detached_cades_sends_data_hashes() {
    let server = MockServer::start().await;
    let data = b"detached content".to_vec();
    let expected_hash = b64(&Sha256::digest(&data));

    Mock::given(method("POST"))
        .and(path("/Api/CadesSignatures/RequiredHashes"))
        .and(body_partial_json(json!({
            "content": "MIA=",
            "mimeType": "application/pkcs7-signature"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["SHA256"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Api/CadesSignatures/Open"))
        .and(body_partial_json(json!({
            "acceptableExplicitPolicies": [
                "3ddd8001-1672-4eb5-a4a2-6e32b17ddc46",
                "a5332ad1-d105-447c-a4bb-b5d02177e439",
                "30d881e7-924a-4a14-b5cc-d5a1717d92f6"
            ],
            "dataHashes": [{"algorithm": "SHA256", "value": expected_hash, "hexValue": null}],
            "file": {"mimeType": "application/pkcs7-signature"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encapsulatedContentType": "Data",
            "hasEncapsulatedContent": false,
            "signers": [signer_json()]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let signature = CadesSignatureExplorer::new(&client)
        .with_signature_file(vec![0x30, 0x80])
        .with_data_file(data)
        .with_acceptable_explicit_policies(StandardSignaturePolicyCatalog::pki_brazil_cades())
        .open()
        .await
        .unwrap();

    assert!(!signature.has_encapsulated_content);
    assert_eq!(signature.signers.len(), 1);
}

#[tokio::test]
async fn test_open_cades_without_data_file_skips_required_hashes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Api/CadesSignatures/RequiredHashes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Api/CadesSignatures/Open"))
        .and(body_partial_json(json!({"dataHashes": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hasEncapsulatedContent": true,
            "signers": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let signature = CadesSignatureExplorer::new(&client)
        .with_signature_file(vec![0x30, 0x80])
        .open()
        .await
        .unwrap();
    assert!(signature.has_encapsulated_content);
}

#[tokio::test]
async fn test_open_detached_cades_without_required_hashes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Api/CadesSignatures/RequiredHashes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Api/CadesSignatures/Open"))
        .and(body_partial_json(json!({"dataHashes": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hasEncapsulatedContent": false,
            "signers": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let signature = CadesSignatureExplorer::new(&client)
        .with_signature_file(vec![0x30, 0x80])
        .with_data_file(b"detached content".to_vec())
        .open()
        .await
        .unwrap();
    assert!(signature.signers.is_empty());
}

#[tokio::test]
async fn test_open_detached_cades_unknown_required_hash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Api/CadesSignatures/RequiredHashes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["SHA256", "WHIRLPOOL"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Api/CadesSignatures/Open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"signers": []})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let err = CadesSignatureExplorer::new(&client)
        .with_signature_file(vec![0x30, 0x80])
        .with_data_file(b"detached content".to_vec())
        .open()
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::UnsupportedDigestAlgorithm(ref name) if name == "WHIRLPOOL"));
}

#[tokio::test]
async fn test_open_without_file() {
    let server = MockServer::start().await;
    let client = client(&server);
    let err = PadesSignatureExplorer::new(&client).open().await.unwrap_err();
    assert!(matches!(err, RestError::MissingParameter(_)));
}

#[tokio::test]
async fn test_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Api/Authentications"))
        .and(body_partial_json(json!({
            "securityContextId": "201856ce-273c-4058-a872-8937bd547d36"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "auth-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Api/Authentications/auth-1/Finalize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "certificate": {"subjectName": {"commonName": "Alan Turing"}},
            "validationResults": {"errors": [], "warnings": [], "passedChecks": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let auth = client.authentication();
    let token = auth
        .start_with_web_pki(StandardSecurityContexts::PKI_BRAZIL)
        .await
        .unwrap();
    assert_eq!(token, "auth-1");

    let result = auth.complete_with_web_pki(&token).await.unwrap();
    assert!(result.is_valid());
    assert_eq!(
        result.certificate.unwrap().subject_common_name(),
        "Alan Turing"
    );
}

#[tokio::test]
async fn test_presets_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Api/PadesVisualPositioningPresets/Footnote"))
        .and(query_param("pageNumber", "-1"))
        .and(query_param("rows", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pageNumber": -1,
            "measurementUnits": "Centimeters",
            "auto": {
                "container": {"left": 1.5, "right": 1.5, "bottom": 1.5, "height": 3.0},
                "signatureRectangleSize": {"width": 7.0, "height": 3.0},
                "rowSpacing": 0.0
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Api/PadesVisualPositioningPresets/NewPage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pageNumber": 0,
            "measurementUnits": "Centimeters"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.footnote_preset(Some(-1), Some(2)).await.unwrap();
    let second = client.footnote_preset(Some(-1), Some(2)).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.page_number, Some(-1));
    assert!(first.auto.is_some());

    client.new_page_preset().await.unwrap();
    let new_page = client.new_page_preset().await.unwrap();
    assert_eq!(new_page.page_number, Some(0));
}

fn b64(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
