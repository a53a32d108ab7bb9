use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use carlot::api::AppState;
use carlot::config::Config;
use carlot::constants::DEFAULT_API_KEY;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    spawn_app_with_state().await.0
}

async fn spawn_app_with_state() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = carlot::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    (carlot::api::router(state.clone()).await, state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

fn car(make: &str, model: &str, year: i32, price: i64) -> Value {
    json!({
        "make": make,
        "model": model,
        "year": year,
        "price": price,
        "mileage": 12000,
        "color": "Silver",
        "fuelType": "Gasoline",
        "transmission": "Automatic",
        "bodyType": "Sedan",
        "images": [],
        "description": "Well kept",
        "features": ["Bluetooth"],
    })
}

async fn create_car(app: &Router, body: Value) -> String {
    let (status, created) = send(app, "POST", "/api/admin/cars", Some(DEFAULT_API_KEY), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created["id"].as_str().unwrap().to_string()
}

/// Signs up a customer and returns their API key.
async fn customer_key(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Jane Doe", "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["role"], "customer");
    body["apiKey"].as_str().unwrap().to_string()
}

fn ids(cars: &Value) -> Vec<&str> {
    cars.as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_admin_gate() {
    let app = spawn_app().await;
    let customer = customer_key(&app, "jane@example.com").await;

    let (status, body) = get(&app, "/api/admin/stats").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(&app, "GET", "/api/admin/stats", Some("wrong-key"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/admin/stats", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/metrics", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) = send(&app, "GET", "/api/admin/stats", Some(DEFAULT_API_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalUsers"], 1);
    assert_eq!(stats["totalCars"], 0);
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/users")
                .header("Authorization", format!("Bearer {DEFAULT_API_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_routes_require_viewer() {
    let app = spawn_app().await;

    for uri in [
        "/api/user/favorites",
        "/api/user/preferences",
        "/api/user/inquiries",
        "/api/auth/me",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_create_car_validation() {
    let app = spawn_app().await;

    let mut missing = car("Toyota", "Camry", 2023, 28_500);
    missing.as_object_mut().unwrap().remove("color");
    let (status, body) = send(&app, "POST", "/api/admin/cars", Some(DEFAULT_API_KEY), Some(missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "color is required");

    let mut bad_enum = car("Toyota", "Camry", 2023, 28_500);
    bad_enum["bodyType"] = json!("Minivan");
    let (status, _) = send(&app, "POST", "/api/admin/cars", Some(DEFAULT_API_KEY), Some(bad_enum)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut negative = car("Toyota", "Camry", 2023, 28_500);
    negative["price"] = json!(-1);
    let (status, _) = send(&app, "POST", "/api/admin/cars", Some(DEFAULT_API_KEY), Some(negative)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_car_crud_and_shape() {
    let app = spawn_app().await;

    let mut body = car("Honda", "CR-V", 2022, 32_000);
    body["fuelType"] = json!("HYBRID");
    body["bodyType"] = json!("suv");
    let id = create_car(&app, body).await;

    let (status, fetched) = get(&app, &format!("/api/cars/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["fuelType"], "Hybrid");
    assert_eq!(fetched["bodyType"], "Suv");
    assert_eq!(fetched["transmission"], "Automatic");
    assert_eq!(fetched["isAvailable"], true);
    assert_eq!(fetched["viewCount"], 0);
    assert!(fetched["createdAt"].as_str().unwrap().ends_with('Z'));

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/admin/cars/{id}"),
        Some(DEFAULT_API_KEY),
        Some(json!({ "price": 30000, "isAvailable": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 30_000);
    assert_eq!(updated["isAvailable"], false);
    assert_eq!(updated["model"], "CR-V");

    let (status, body) = send(&app, "DELETE", &format!("/api/admin/cars/{id}"), Some(DEFAULT_API_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = get(&app, &format!("/api/cars/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Car not found");

    let (status, _) = send(&app, "DELETE", &format!("/api/admin/cars/{id}"), Some(DEFAULT_API_KEY), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sentinel_empty_and_absent_filters_are_equivalent() {
    let app = spawn_app().await;
    create_car(&app, car("Toyota", "Camry", 2023, 28_500)).await;
    create_car(&app, car("Ford", "F-150", 2022, 38_000)).await;

    let (_, absent) = get(&app, "/api/cars").await;
    let (_, empty) = get(&app, "/api/cars?make=&fuelType=&minPrice=&search=").await;
    let (_, sentinel) = get(&app, "/api/cars?make=Any&fuelType=any&bodyType=ANY&maxYear=Any").await;
    let (_, garbage) = get(&app, "/api/cars?minPrice=abc&maxPrice=NaN&fuelType=plasma").await;

    assert_eq!(absent.as_array().unwrap().len(), 2);
    assert_eq!(absent, empty);
    assert_eq!(absent, sentinel);
    assert_eq!(absent, garbage);
}

#[tokio::test]
async fn test_numeric_bounds_are_inclusive() {
    let app = spawn_app().await;
    let low = create_car(&app, car("Kia", "Rio", 2020, 10_000)).await;
    let high = create_car(&app, car("Kia", "Soul", 2021, 20_000)).await;
    create_car(&app, car("Kia", "Stinger", 2022, 20_001)).await;

    let (status, cars) = get(&app, "/api/cars?minPrice=10000&maxPrice=20000").await;
    assert_eq!(status, StatusCode::OK);

    let mut found = ids(&cars);
    found.sort_unstable();
    let mut expected = vec![low.as_str(), high.as_str()];
    expected.sort_unstable();
    assert_eq!(found, expected);

    let (_, cars) = get(&app, "/api/cars?minYear=2021.9&maxYear=2021").await;
    assert_eq!(ids(&cars), vec![high.as_str()]);
}

#[tokio::test]
async fn test_search_tokens_are_or_ed() {
    let app = spawn_app().await;
    let toyota = create_car(&app, car("Toyota", "Corolla", 2024, 24_000)).await;
    let ford_2023 = create_car(&app, car("Ford", "Focus", 2023, 18_000)).await;
    create_car(&app, car("Mazda", "3", 2021, 21_000)).await;

    let (_, cars) = get(&app, "/api/cars?search=toyota%202023").await;
    let found = ids(&cars);

    assert_eq!(found.len(), 2, "{cars}");
    assert!(found.contains(&toyota.as_str()));
    assert!(found.contains(&ford_2023.as_str()));

    let (_, cars) = get(&app, "/api/cars?search=Bluetooth").await;
    assert_eq!(cars.as_array().unwrap().len(), 3);

    let (_, cars) = get(&app, "/api/cars?search=bluetooth").await;
    assert!(cars.as_array().unwrap().is_empty(), "features match exactly");

    let (_, cars) = get(&app, "/api/cars?search=COROLLA").await;
    assert_eq!(ids(&cars), vec![toyota.as_str()]);
}

#[tokio::test]
async fn test_text_matching_folds_non_ascii_case() {
    let app = spawn_app().await;
    let mut skoda = car("Škoda", "Octavia", 2022, 22_000);
    skoda["color"] = json!("Grün");
    let skoda = create_car(&app, skoda).await;
    let renamed = create_car(&app, car("Dacia", "Duster", 2021, 15_000)).await;

    // Škoda, škoda, ŠKODA
    for query in [
        "search=%C5%A0koda",
        "search=%C5%A1koda",
        "search=%C5%A0KODA",
        "make=%C5%A1koda",
        "search=GR%C3%9CN",
    ] {
        let (status, cars) = get(&app, &format!("/api/cars?{query}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&cars), vec![skoda.as_str()], "{query}: {cars}");
    }

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/admin/cars/{renamed}"),
        Some(DEFAULT_API_KEY),
        Some(json!({ "make": "Ĺada" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, cars) = get(&app, "/api/cars?make=%C4%BAada").await;
    assert_eq!(ids(&cars), vec![renamed.as_str()], "{cars}");

    let (_, cars) = get(&app, "/api/cars?search=dacia").await;
    assert!(cars.as_array().unwrap().is_empty(), "{cars}");
}

#[tokio::test]
async fn test_fuel_type_and_max_price() {
    let app = spawn_app().await;

    let mut cheap_ev = car("Nissan", "Leaf", 2022, 22_000);
    cheap_ev["fuelType"] = json!("Electric");
    let cheap_ev = create_car(&app, cheap_ev).await;

    let mut pricey_ev = car("Tesla", "Model 3", 2023, 45_000);
    pricey_ev["fuelType"] = json!("Electric");
    create_car(&app, pricey_ev).await;

    create_car(&app, car("Toyota", "Camry", 2023, 20_000)).await;

    let (status, cars) = get(&app, "/api/cars?fuelType=electric&maxPrice=30000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&cars), vec![cheap_ev.as_str()]);
    assert_eq!(cars[0]["fuelType"], "Electric");
}

#[tokio::test]
async fn test_public_listing_hides_sold_cars() {
    let app = spawn_app().await;
    let available = create_car(&app, car("Toyota", "Camry", 2023, 28_500)).await;

    let mut sold = car("Honda", "Civic", 2020, 18_000);
    sold["isAvailable"] = json!(false);
    let sold = create_car(&app, sold).await;

    let (_, public) = get(&app, "/api/cars").await;
    assert_eq!(ids(&public), vec![available.as_str()]);

    let (status, admin) = send(&app, "GET", "/api/admin/cars", Some(DEFAULT_API_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admin.as_array().unwrap().len(), 2);
    assert!(ids(&admin).contains(&sold.as_str()));

    let (status, detail) = get(&app, &format!("/api/cars/{sold}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["isAvailable"], false);

    let (_, featured) = get(&app, "/api/cars/featured").await;
    assert_eq!(ids(&featured), vec![available.as_str()]);
}

#[tokio::test]
async fn test_similar_vehicles() {
    let app = spawn_app().await;

    let current = create_car(&app, car("Honda", "Accord", 2022, 27_000)).await;
    let same_make = create_car(&app, car("Honda", "Civic", 2021, 22_000)).await;

    let mut same_body = car("Ford", "Explorer", 2022, 35_000);
    same_body["bodyType"] = json!("SUV");
    let same_body = create_car(&app, same_body).await;

    let mut unrelated = car("Ram", "1500", 2022, 40_000);
    unrelated["bodyType"] = json!("Truck");
    create_car(&app, unrelated).await;

    let mut sold = car("Honda", "Fit", 2019, 12_000);
    sold["isAvailable"] = json!(false);
    create_car(&app, sold).await;

    let (status, similar) = get(
        &app,
        &format!("/api/cars/similar?make=Honda&bodyType=SUV&exclude={current}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&similar), vec![same_make.as_str(), same_body.as_str()]);

    let (_, banded) = get(
        &app,
        &format!("/api/cars/similar?make=Honda&bodyType=SUV&exclude={current}&price=33000&band=3000"),
    )
    .await;
    assert_eq!(ids(&banded), vec![same_body.as_str()]);

    let (_, limited) = get(&app, "/api/cars/similar?make=Honda&bodyType=Sedan&limit=1").await;
    assert_eq!(limited.as_array().unwrap().len(), 1);

    let (status, body) = get(&app, "/api/cars/similar?make=Honda").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Make and bodyType are required");
}

#[tokio::test]
async fn test_view_counter() {
    let app = spawn_app().await;
    let id = create_car(&app, car("Toyota", "Camry", 2023, 28_500)).await;

    let (_, body) = get(&app, &format!("/api/cars/{id}/view")).await;
    assert_eq!(body["viewCount"], 0);

    send(&app, "POST", &format!("/api/cars/{id}/view"), None, None).await;
    let (status, body) = send(&app, "POST", &format!("/api/cars/{id}/view"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "viewCount": 2 }));

    let (_, body) = get(&app, &format!("/api/cars/{id}")).await;
    assert_eq!(body["viewCount"], 2);

    let (status, _) = send(&app, "POST", "/api/cars/missing/view", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/cars/missing/view").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["viewCount"], 0);
}

#[tokio::test]
async fn test_main_image_redirect() {
    let app = spawn_app().await;

    let mut with_cdn = car("Toyota", "Camry", 2023, 28_500);
    with_cdn["images"] = json!(["https://res.cloudinary.com/demo/image/upload/v1/cars/camry.jpg"]);
    let with_cdn = create_car(&app, with_cdn).await;
    let without = create_car(&app, car("Ford", "Focus", 2020, 15_000)).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/cars/{with_cdn}/image?size=thumbnail"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://res.cloudinary.com/demo/image/upload/f_auto,q_auto,w_200,h_150,c_fill/v1/cars/camry.jpg"
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/cars/{without}/image"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/placeholder.svg?height=300&width=400"
    );
}

#[tokio::test]
async fn test_favorite_double_toggle_restores_state() {
    let app = spawn_app().await;
    let key = customer_key(&app, "fav@example.com").await;
    let id = create_car(&app, car("Toyota", "Camry", 2023, 28_500)).await;
    let uri = format!("/api/user/favorites/{id}");

    let (_, anonymous) = get(&app, &uri).await;
    assert_eq!(anonymous, json!({ "isFavorite": false }));

    let (status, _) = send(&app, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, before) = send(&app, "GET", &uri, Some(&key), None).await;
    assert_eq!(before["isFavorite"], false);

    let (status, toggled) = send(&app, "POST", &uri, Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["isFavorite"], true);

    let (_, favorites) = send(&app, "GET", "/api/user/favorites", Some(&key), None).await;
    assert_eq!(ids(&favorites), vec![id.as_str()]);

    let (_, toggled) = send(&app, "POST", &uri, Some(&key), None).await;
    assert_eq!(toggled["isFavorite"], false);

    let (_, after) = send(&app, "GET", &uri, Some(&key), None).await;
    assert_eq!(after, before);

    let (status, _) = send(&app, "POST", "/api/user/favorites/missing", Some(&key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_and_inquiry_management() {
    let app = spawn_app().await;
    let key = customer_key(&app, "buyer@example.com").await;
    let car_id = create_car(&app, car("Toyota", "Camry", 2023, 28_500)).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/contact",
        None,
        Some(json!({ "name": "Walk In", "email": "walkin@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "message is required");

    let (status, _) = send(
        &app,
        "POST",
        "/api/contact",
        None,
        Some(json!({
            "name": "Walk In",
            "email": "walkin@example.com",
            "message": "Hello",
            "carId": "missing",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/contact",
        Some(&key),
        Some(json!({
            "name": "Jane Doe",
            "email": "buyer@example.com",
            "phone": "555-0100",
            "message": "Is the Camry still available?",
            "carId": car_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Thank you for your inquiry. We will contact you soon!"
    );
    let inquiry_id = body["inquiryId"].as_str().unwrap().to_string();

    let (_, own) = send(&app, "GET", "/api/user/inquiries", Some(&key), None).await;
    assert_eq!(own.as_array().unwrap().len(), 1);
    assert_eq!(own[0]["status"], "new");
    assert_eq!(own[0]["car"]["model"], "Camry");

    let (_, all) = send(&app, "GET", "/api/admin/inquiries", Some(DEFAULT_API_KEY), None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let uri = format!("/api/admin/inquiries/{inquiry_id}");
    let (status, body) = send(&app, "PATCH", &uri, Some(DEFAULT_API_KEY), Some(json!({ "status": "archived" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid status");

    let (status, _) = send(&app, "PATCH", &uri, Some(DEFAULT_API_KEY), Some(json!({ "status": "closed" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "PATCH", &uri, Some(DEFAULT_API_KEY), Some(json!({ "status": "new" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/admin/inquiries/missing",
        Some(DEFAULT_API_KEY),
        Some(json!({ "status": "contacted" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = send(&app, "GET", "/api/admin/stats", Some(DEFAULT_API_KEY), None).await;
    assert_eq!(stats["totalInquiries"], 1);
    assert_eq!(stats["newInquiries"], 1);
    assert_eq!(stats["totalUsers"], 1);
    assert_eq!(stats["availableCars"], 1);
    assert_eq!(stats["recentInquiries"][0]["id"], inquiry_id.as_str());
}

#[tokio::test]
async fn test_signup_and_login() {
    let app = spawn_app().await;
    let signup = json!({ "name": "Jane", "email": "Jane@Example.com", "password": "secret123" });

    let (status, body) = send(&app, "POST", "/api/auth/signup", None, Some(signup.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "jane@example.com");
    assert_eq!(body["user"]["role"], "customer");
    assert!(body["user"].get("apiKey").is_none());
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = send(&app, "POST", "/api/auth/signup", None, Some(signup)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this email already exists");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Short", "email": "short@example.com", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "jane@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": "jane@example.com", "password": "secret123" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let me: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(me["user"]["name"], "Jane");
}

#[tokio::test]
async fn test_preferences_and_profile() {
    let app = spawn_app().await;
    let key = customer_key(&app, "prefs@example.com").await;

    let (status, body) = send(&app, "GET", "/api/user/preferences", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferences"]["emailNotifications"], true);
    assert_eq!(body["preferences"]["maxPrice"], 50_000);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/user/preferences",
        Some(&key),
        Some(json!({ "smsNotifications": true, "preferredMakes": ["Toyota"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferences"]["smsNotifications"], true);
    assert_eq!(body["preferences"]["emailNotifications"], true);

    let (_, body) = send(&app, "GET", "/api/user/preferences", Some(&key), None).await;
    assert_eq!(body["preferences"]["preferredMakes"], json!(["Toyota"]));

    let (status, body) = send(
        &app,
        "PUT",
        "/api/user/profile",
        Some(&key),
        Some(json!({ "name": "", "phone": "555-0199" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Jane Doe");
    assert_eq!(body["user"]["phone"], "555-0199");

    let (_, body) = send(&app, "PUT", "/api/user/profile", Some(&key), Some(json!({ "phone": "" }))).await;
    assert_eq!(body["user"]["phone"], Value::Null);

    customer_key(&app, "taken@example.com").await;
    let (status, _) = send(
        &app,
        "PUT",
        "/api/user/profile",
        Some(&key),
        Some(json!({ "email": "taken@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_api_key_regeneration() {
    let app = spawn_app().await;
    let key = customer_key(&app, "keys@example.com").await;

    let (_, body) = send(&app, "GET", "/api/auth/api-key", Some(&key), None).await;
    assert_eq!(body["apiKey"], key.as_str());

    let (status, body) = send(&app, "POST", "/api/auth/api-key/regenerate", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["apiKey"].as_str().unwrap().to_string();
    assert_ne!(fresh, key);
    assert_eq!(fresh.len(), 64);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&key), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_is_single_use() {
    let (app, state) = spawn_app_with_state().await;
    customer_key(&app, "jane@example.com").await;

    let (status, known) = send(
        &app,
        "POST",
        "/api/auth/request-reset",
        None,
        Some(json!({ "email": "jane@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, unknown) = send(
        &app,
        "POST",
        "/api/auth/request-reset",
        None,
        Some(json!({ "email": "nobody@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(known, unknown);

    let auth = state.auth_service();
    assert!(
        auth.request_password_reset("nobody@example.com")
            .await
            .unwrap()
            .is_none()
    );
    let token = auth
        .request_password_reset("Jane@Example.com")
        .await
        .unwrap()
        .expect("token for a registered email");

    let reset = |body: Value| send(&app, "POST", "/api/auth/reset-password", None, Some(body));

    let (status, body) = reset(json!({ "token": token })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request");

    let (id, _) = token.split_once('.').unwrap();
    let (status, body) = reset(json!({ "token": format!("{id}.deadbeef"), "password": "brandnew1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Token invalid or expired");

    let (status, body) = reset(json!({ "token": token, "password": "brandnew1" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Password reset successful");

    let (status, _) = reset(json!({ "token": token, "password": "another22" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let login = |password: &str| {
        send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": password })),
        )
    };
    assert_eq!(login("secret123").await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(login("brandnew1").await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_reset_token_is_rejected() {
    use carlot::entities::{password_reset_tokens, prelude::PasswordResetTokens};
    use sea_orm::{EntityTrait, sea_query::Expr};

    let (app, state) = spawn_app_with_state().await;
    customer_key(&app, "jane@example.com").await;

    let token = state
        .auth_service()
        .request_password_reset("jane@example.com")
        .await
        .unwrap()
        .unwrap();

    PasswordResetTokens::update_many()
        .col_expr(
            password_reset_tokens::Column::ExpiresAt,
            Expr::value("2000-01-01T00:00:00.000Z"),
        )
        .exec(&state.store().conn)
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "token": token, "password": "brandnew1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Token invalid or expired");
}

#[tokio::test]
async fn test_admin_currency_setting() {
    let app = spawn_app().await;
    let customer = customer_key(&app, "jane@example.com").await;

    let (status, _) = get(&app, "/api/admin/currency").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/api/admin/currency", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/currency",
        Some(&customer),
        Some(json!({ "currency": "NGN" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/api/admin/currency", Some(DEFAULT_API_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "currency": "USD" }));

    for invalid in [json!({ "currency": "EUR" }), json!({ "currency": "usd" }), json!({})] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/admin/currency",
            Some(DEFAULT_API_KEY),
            Some(invalid),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid currency");
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/currency",
        Some(DEFAULT_API_KEY),
        Some(json!({ "currency": "NGN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "NGN");
    assert!(body["updatedAt"].is_string());

    let (_, body) = send(&app, "GET", "/api/admin/currency", Some(DEFAULT_API_KEY), None).await;
    assert_eq!(body["currency"], "NGN");
}
