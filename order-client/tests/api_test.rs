use order_client::{ClientError, OrderApiClient, OrderDraft};
use order_types::{ClientRequest, PaymentStatus, Period, SettingsPayload};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn order_json(id: Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "clienteId": "7f0a3c1e-2d4b-4b8e-9c6a-1f2e3d4c5b6a",
        "descricao": null,
        "itens": [{"descricao": "Barra", "preco": 15.5}],
        "dataCriacao": "2025-03-10T12:00:00Z",
        "dataEntrega": "2025-04-02",
        "statusServico": "EM_ANDAMENTO",
        "statusPagamento": status,
        "valorTotal": 15.5,
        "valorPago": 15.5,
        "formaPagamento": "Pix",
        "fotos": []
    })
}

async fn setup() -> (MockServer, OrderApiClient) {
    let server = MockServer::start().await;
    let client = OrderApiClient::new(format!("{}/", server.uri()));
    (server, client)
}

#[tokio::test]
async fn pay_transition_decodes_the_order() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path(format!("/api/pedidos/{}/pay", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json(id, "PAGO")))
        .expect(1)
        .mount(&server)
        .await;

    let order = client.mark_paid(id).await.unwrap();
    assert_eq!(order.id, id);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path(format!("/api/pedidos/{}/withdraw", id)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Pedido não encontrado"})))
        .mount(&server)
        .await;

    let err = client.mark_withdrawn(id).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref m) if m == "Pedido não encontrado"));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn empty_transition_body_is_not_found() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path(format!("/api/pedidos/{}/pay", id)))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client.mark_paid(id).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn refused_client_delete_is_a_typed_conflict() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/api/clientes/{}", id)))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "Não é possível excluir cliente com pedidos vinculados."
        })))
        .mount(&server)
        .await;

    match client.delete_client(id).await.unwrap_err() {
        ClientError::Api { status, message, details } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Não é possível excluir cliente com pedidos vinculados.");
            assert_eq!(details, None);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn validation_details_are_kept() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": "Validation error",
            "details": "nome: Name is required"
        })))
        .mount(&server)
        .await;

    let request = ClientRequest {
        name: String::new(),
        phone: None,
        cpf: None,
    };
    match client.create_client(&request).await.unwrap_err() {
        ClientError::Api { status, details, .. } => {
            assert_eq!(status, 422);
            assert_eq!(details.as_deref(), Some("nome: Name is required"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn draft_is_submitted_with_derived_values() {
    let (server, client) = setup().await;
    let client_id = Uuid::new_v4();
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/pedidos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json(id, "PARCIAL")))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = OrderDraft::new();
    draft.set_client(client_id);
    draft.set_item_price(0, "20,00");
    draft.set_paid("5");

    let saved = client.save_draft(None, &draft).await.unwrap();
    assert_eq!(saved.id, id);

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["clienteId"], json!(client_id));
    assert_eq!(sent["statusPagamento"], "PARCIAL");
    assert_eq!(sent["formaPagamento"], "Dinheiro");
}

#[tokio::test]
async fn draft_without_client_never_reaches_the_server() {
    let (server, client) = setup().await;

    let err = client.save_draft(None, &OrderDraft::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Draft(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn finance_query_parameters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/financeiro"))
        .and(query_param("periodo", "PERSONALIZADO"))
        .and(query_param("inicio", "2025-01-01"))
        .and(query_param("fim", "2025-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalGeral": 150.0,
            "totalRecebido": 100.0,
            "totalAReceber": 50.0,
            "pendencias": 1,
            "quantidade": 2,
            "porFormaPagamento": {"Pix": 100.0}
        })))
        .mount(&server)
        .await;

    let summary = client
        .finance_summary(
            Period::Personalizado,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
            chrono::NaiveDate::from_ymd_opt(2025, 1, 31),
        )
        .await
        .unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.by_payment_method.get("Pix"), Some(&100.0));
}

#[tokio::test]
async fn settings_round_trip_as_a_flat_object() {
    let (server, client) = setup().await;
    let settings: SettingsPayload = [("receipt_name".to_string(), "Ateliê".to_string())]
        .into_iter()
        .collect();

    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .and(body_json(json!({"receipt_name": "Ateliê"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    client.save_settings(&settings).await.unwrap();
}

#[tokio::test]
async fn failed_login_is_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Usuário ou senha inválidos"
        })))
        .mount(&server)
        .await;

    let err = client.login("ana", "errada").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}
