use super::*;

//-----------------------------------------------------------------------------

fn check_dictionary(dict: &BarcodeDictionary, truth: &[&str], missing: &[&str]) {
    assert_eq!(dict.len(), truth.len(), "Incorrect dictionary length");
    assert_eq!(dict.is_empty(), truth.is_empty(), "Incorrect dictionary emptiness");

    for (id, barcode) in truth.iter().enumerate() {
        assert_eq!(dict.id(barcode), Some(id as BarcodeId), "Invalid id for barcode {}", barcode);
        assert_eq!(dict.get(barcode).unwrap(), id as BarcodeId, "Invalid get() result for barcode {}", barcode);
    }
    for barcode in missing.iter() {
        assert!(dict.id(barcode).is_none(), "Barcode {} should not be present", barcode);
        assert!(dict.get(barcode).is_err(), "Barcode {} should not resolve", barcode);
    }
}

//-----------------------------------------------------------------------------

#[test]
fn empty_dictionary() {
    let dict = BarcodeDictionary::new();
    check_dictionary(&dict, &[], &["AACA", "GGTT"]);
}

#[test]
fn ids_follow_insertion_order() {
    let truth = ["AACA", "GGTT", "TTAC", "CCCC"];
    let mut dict = BarcodeDictionary::new();
    for (id, barcode) in truth.iter().enumerate() {
        assert_eq!(dict.add(barcode), id as BarcodeId, "Invalid id assigned to barcode {}", barcode);
    }
    check_dictionary(&dict, &truth, &["ACGT"]);
}

#[test]
fn add_is_idempotent() {
    let mut dict = BarcodeDictionary::new();
    let first = dict.add("AACA");
    let second = dict.add("GGTT");
    assert_eq!(dict.add("AACA"), first, "Re-adding a barcode changed its id");
    assert_eq!(dict.add("GGTT"), second, "Re-adding a barcode changed its id");
    assert_eq!(dict.len(), 2, "Re-adding barcodes changed the dictionary size");

    // The round-trip law: get() returns what add() returned.
    assert_eq!(dict.get("AACA").unwrap(), first);
    assert_eq!(dict.get("GGTT").unwrap(), second);
}

#[test]
fn unknown_barcode_error() {
    let mut dict = BarcodeDictionary::new();
    let _ = dict.add("AACA");
    let result = dict.get("TTTT");
    assert!(
        matches!(result, Err(Error::UnknownBarcode(ref barcode)) if barcode == "TTTT"),
        "Unexpected result for an unknown barcode: {:?}", result
    );
}

//-----------------------------------------------------------------------------
