//! End-to-end checkout scenarios through the estimate-only service.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use parcel_rates::domain::value_objects::CostComponent;
use parcel_rates::{
    Money, Package, QuoteSource, ServiceTier, ShippingConfig, ShippingOption, ShippingService,
    ValidationError,
};

fn shop() -> ShippingService {
    ShippingService::from_config(&ShippingConfig::new("98101")).unwrap()
}

fn record(weight_oz: Option<f64>, dims: &str) -> Package {
    Package::from_record(weight_oz, Some(dims), ShippingOption::Calculated, None).unwrap()
}

#[tokio::test]
async fn book_by_media_mail() {
    let book = record(Some(6.0), "7.5x5.0x0.8");
    let near = shop()
        .calculate_shipping(&book, "98109", ServiceTier::MediaMail)
        .await
        .unwrap();
    let far = shop()
        .calculate_shipping(&book, "02134", ServiceTier::MediaMail)
        .await
        .unwrap();

    assert!(near.rate() < Money::from_cents(500));
    assert!(far.rate() > near.rate());
    assert_eq!(near.source(), QuoteSource::Estimated);
    assert_eq!(near.service_name(), "USPS Media Mail");
    assert_eq!(
        near.component(CostComponent::Base),
        far.component(CostComponent::Base)
    );
}

#[tokio::test]
async fn ten_pound_box_by_ground_advantage() {
    let parcel = record(Some(160.0), "8 x 10 x 12");
    let quote = shop()
        .calculate_shipping(&parcel, "10001", ServiceTier::GroundAdvantage)
        .await
        .unwrap();

    assert!(quote.rate() < Money::from_cents(3000));
    let components: Vec<_> = quote.breakdown().iter().map(|l| l.component).collect();
    assert_eq!(components, CostComponent::ALL.to_vec());
    assert_eq!(quote.billable_weight_lbs(), 10.0);
}

#[tokio::test]
async fn truncated_zip_is_validation_error() {
    let book = record(Some(6.0), "7.5x5.0x0.8");
    let err = shop()
        .calculate_shipping(&book, "981", ServiceTier::MediaMail)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidPostalCode { .. }));
}

#[tokio::test]
async fn all_four_tiers_ascending() {
    let book = record(Some(6.0), "7.5x5.0x0.8");
    let options = shop().get_shipping_options(&book, "60601").await.unwrap();

    let tiers: Vec<_> = options.iter().map(|q| q.service()).collect();
    assert_eq!(tiers.len(), 4);
    for tier in ServiceTier::ALL {
        assert!(tiers.contains(&tier));
    }
    for pair in options.windows(2) {
        assert!(pair[0].rate() < pair[1].rate());
    }
}

#[tokio::test]
async fn bulky_record_without_weight_uses_dimensions() {
    let pillow = record(None, "20x20x10");
    let quote = shop()
        .calculate_shipping(&pillow, "30301", ServiceTier::GroundAdvantage)
        .await
        .unwrap();
    assert!((quote.billable_weight_lbs() - 4000.0 / 166.0).abs() < 1e-9);
}

#[tokio::test]
async fn zero_dimensions_mean_actual_weight() {
    let pkg = record(Some(32.0), "0x0x0");
    let quote = shop()
        .calculate_shipping(&pkg, "30301", ServiceTier::PriorityMail)
        .await
        .unwrap();
    assert_eq!(quote.billable_weight_lbs(), 2.0);
    assert_eq!(quote.component(CostComponent::SizeSurcharge), Money::ZERO);
}

#[tokio::test]
async fn quotes_serialize_for_json_clients() {
    let options = shop()
        .get_shipping_options(&record(Some(6.0), "7.5x5.0x0.8"), "60601")
        .await
        .unwrap();
    let json = serde_json::to_value(&options).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 4);
    assert!(json[0]["breakdown"].is_array());
    assert_eq!(json[0]["source"], "ESTIMATED");
}
