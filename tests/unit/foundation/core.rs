use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 4).is_err());
    assert!(Canvas::new(4, 0).is_err());
    let c = Canvas::new(3, 2).unwrap();
    assert_eq!(c.pixel_count(), 6);
}

#[test]
fn unit_ids_expose_their_index() {
    assert_eq!(UnitId::Sequential.index(), 0);
    assert_eq!(UnitId::Thread(3).index(), 3);
    assert_eq!(UnitId::Process(7).index(), 7);
}

#[test]
fn unit_id_display_names_the_kind() {
    assert_eq!(UnitId::Sequential.to_string(), "sequential");
    assert_eq!(UnitId::Thread(2).to_string(), "thread 2");
    assert_eq!(UnitId::Process(1).to_string(), "process 1");
}

#[test]
fn unit_id_serializes_for_the_wire() {
    let json = serde_json::to_string(&UnitId::Process(5)).unwrap();
    let back: UnitId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, UnitId::Process(5));
}
