use super::*;

fn sample_driver() -> Driver {
    let account = Account::new(
        "bob.halov".to_string(),
        "bob".to_string(),
        "halov".to_string(),
        "not-a-real-hash".to_string(),
    );
    let record = DriverRecord::new(account.get_id(), "ADM56984".to_string());
    Driver::from_parts(account, record)
}

#[test]
fn test_driver_from_parts() {
    let driver = sample_driver();

    assert_eq!(driver.get_username(), "bob.halov");
    assert_eq!(driver.get_license_number(), "ADM56984");
    assert_eq!(driver.get_id(), driver.account().get_id());
}

#[test]
fn test_driver_display() {
    let driver = sample_driver();
    assert_eq!(driver.to_string(), "bob.halov (bob halov)");
}

#[test]
fn test_driver_absolute_url() {
    let driver = sample_driver();
    assert_eq!(
        driver.get_absolute_url(),
        format!("/drivers/{}/", driver.get_id())
    );
}

#[test]
fn test_driver_serializes_flat() {
    let driver = sample_driver();
    let json = serde_json::to_value(&driver).unwrap();

    assert_eq!(json["username"], "bob.halov");
    assert_eq!(json["first_name"], "bob");
    assert_eq!(json["license_number"], "ADM56984");
    assert_eq!(json["id"], driver.get_id());
    assert!(json.get("password_hash").is_none());
    assert!(json.get("account").is_none());
}

#[test]
fn test_driver_deserializes_from_flat_json() {
    let driver = sample_driver();
    let json = serde_json::to_string(&driver).unwrap();
    let parsed: Driver = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.get_id(), driver.get_id());
    assert_eq!(parsed.get_license_number(), "ADM56984");
    assert_eq!(parsed.to_string(), driver.to_string());
}
