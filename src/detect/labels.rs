//! Detection vocabulary.
//!
//! The classifier vocabulary is bounded to road-scene labels, and published
//! labels are the Portuguese names existing consumers expect. Both tables
//! must stay in sync with the deployed consumer app.

/// Map a raw classifier label to its published form.
///
/// Returns `None` for labels outside the allowed vocabulary; those are
/// dropped before they reach the stabilizer.
pub fn normalize_label(label: &str) -> Option<&'static str> {
    match label {
        "person" => Some("pessoa"),
        "bicycle" => Some("bicicleta"),
        "car" => Some("carro"),
        "motorcycle" => Some("moto"),
        "bus" => Some("ônibus"),
        "train" => Some("trem"),
        "truck" => Some("caminhão"),
        "traffic light" => Some("semáforo"),
        "stop sign" => Some("placa de pare"),
        "fire hydrant" => Some("hidrante"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_labels_translate() {
        assert_eq!(normalize_label("car"), Some("carro"));
        assert_eq!(normalize_label("person"), Some("pessoa"));
        assert_eq!(normalize_label("stop sign"), Some("placa de pare"));
    }

    #[test]
    fn unknown_labels_are_dropped() {
        assert_eq!(normalize_label("banana"), None);
        assert_eq!(normalize_label(""), None);
        // Case-sensitive by contract: classifiers emit lowercase labels.
        assert_eq!(normalize_label("Car"), None);
    }
}
