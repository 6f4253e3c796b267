//! Traversal: pointers, records, sequences, path naming and aggregation.

use super::common::{Details, OtherThing, SimpleItem, only_error, valid_test_struct};
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::Arc;
use tagval::checkers::{IntChecker, StringChecker};
use tagval::{
    Engine, FailureKind, Registry, Unit, UnitError, ValidationError, validatable,
    validate_tagged, validate_unit,
};
use uuid::Uuid;

fn paths(err: &ValidationError) -> Vec<&str> {
    err.paths().collect()
}

// ─── Records ────────────────────────────────────────────────────────────────

#[test]
fn valid_record_passes() {
    assert_eq!(validate_tagged(&valid_test_struct()), Ok(()));
}

#[test]
fn every_violation_is_reported_in_one_pass() {
    let mut value = valid_test_struct();
    value.age = 200;
    value.name = String::new();
    value.email = "not-an-email".to_string();
    value.postal_code = "1234".to_string();
    value.score = None;
    value.detail.value = -1;
    value.other_thing.id = 1;

    let err = validate_tagged(&value).unwrap_err();
    assert_eq!(
        paths(&err),
        vec![
            "Age",
            "Detail.Value",
            "Email",
            "Name",
            "OtherThing.ID",
            "PostalCode",
            "Score",
        ]
    );
    assert_eq!(err.len(), 7);
    assert!(only_error(&err, "Score").has_prefix("required:"));
    assert!(only_error(&err, "OtherThing.ID").has_prefix("min:"));
}

#[test]
fn report_is_labelled_with_the_type_name() {
    let mut value = valid_test_struct();
    value.age = 200;
    let err = validate_tagged(&value).unwrap_err();
    assert_eq!(err.data_type.as_deref(), Some("TestStruct"));
    assert_eq!(
        err.to_string(),
        "TestStruct validation failed:\tAge: max: the field Age value 200 is greater than the maximum value 150"
    );
}

#[test]
fn display_joins_errors_per_path() {
    let mut errors = tagval::ErrorMap::new();
    errors.insert(
        "A".to_string(),
        vec![
            tagval::FieldError::required("first"),
            tagval::FieldError::invalid("second"),
        ],
    );
    errors.insert("B".to_string(), vec![tagval::FieldError::config("third")]);
    let err = ValidationError::new(errors);
    assert_eq!(
        err.to_string(),
        "value validation failed:\tA: required: first; invalid: second\tB: config: third"
    );
}

#[test]
fn nested_record_paths_are_dotted_once() {
    struct C {
        value: i32,
    }
    struct B {
        c: C,
        n: i32,
    }
    struct A {
        b: B,
    }
    validatable!(C { value as "D": "int,max=1" });
    validatable!(B { c as "C": "struct", n as "N": "int,max=1" });
    validatable!(A { b as "B": "struct" });

    let value = A {
        b: B {
            c: C { value: 5 },
            n: 5,
        },
    };
    let err = validate_tagged(&value).unwrap_err();
    assert_eq!(paths(&err), vec!["B.C.D", "B.N"]);
}

#[test]
fn embedded_record_fields_use_the_type_name() {
    let mut value = valid_test_struct();
    value.other_thing = OtherThing {
        id: 2,
        description: "too short".to_string(),
    };
    let err = validate_tagged(&value).unwrap_err();
    assert_eq!(paths(&err), vec!["OtherThing.Description", "OtherThing.ID"]);
}

#[test]
fn boxed_and_shared_records_are_transparent() {
    struct Holder {
        boxed: Box<Details>,
        shared: Arc<Details>,
    }
    validatable!(Holder {
        boxed as "Boxed": "struct",
        shared as "Shared": "struct",
    });

    let value = Holder {
        boxed: Box::new(Details {
            name: String::new(),
            value: 151,
        }),
        shared: Arc::new(Details {
            name: "x".repeat(51),
            value: 0,
        }),
    };
    let err = validate_tagged(&value).unwrap_err();
    assert_eq!(paths(&err), vec!["Boxed.Value", "Shared.Name"]);
}

#[test]
fn checker_on_a_record_is_a_type_error() {
    struct Wrong {
        detail: Details,
    }
    validatable!(Wrong { detail as "Detail": "int" });

    let err = validate_tagged(&Wrong {
        detail: Details::default(),
    })
    .unwrap_err();
    let error = only_error(&err, "Detail");
    assert_eq!(error.kind, FailureKind::Type);
    assert!(error.message.contains("Details"), "{}", error.message);
}

// ─── Pointers ───────────────────────────────────────────────────────────────

#[test]
fn required_nil_pointer() {
    let item = SimpleItem {
        name: "ok".to_string(),
        description: None,
        other: String::new(),
        other2: String::new(),
        other3: String::new(),
    };
    let err = validate_tagged(&item).unwrap_err();
    assert_eq!(paths(&err), vec!["Description"]);
    assert_eq!(
        only_error(&err, "Description").message,
        "required: field Description was nil but is required"
    );
}

#[test]
fn present_pointer_is_checked_like_its_pointee() {
    let item = SimpleItem {
        name: "ok".to_string(),
        description: Some(String::new()),
        other: String::new(),
        other2: String::new(),
        other3: String::new(),
    };
    let err = validate_tagged(&item).unwrap_err();
    assert_eq!(
        only_error(&err, "Description").message,
        "required: the value of Description is blank"
    );
}

#[test]
fn optional_nil_pointer_is_not_traversed() {
    struct Holder {
        detail: Option<Details>,
        id: Option<Uuid>,
    }
    validatable!(Holder {
        detail as "Detail": "struct",
        id as "ID": "uuid",
    });
    assert_eq!(
        validate_tagged(&Holder {
            detail: None,
            id: None
        }),
        Ok(())
    );
}

#[test]
fn nested_options_collapse() {
    struct Holder {
        value: Option<Option<i32>>,
    }
    validatable!(Holder { value as "Value": "int,required,max=3" });

    let err = validate_tagged(&Holder { value: Some(None) }).unwrap_err();
    assert!(only_error(&err, "Value").has_prefix("required:"));
    let err = validate_tagged(&Holder {
        value: Some(Some(4)),
    })
    .unwrap_err();
    assert!(only_error(&err, "Value").has_prefix("max:"));
}

#[test]
fn required_nil_sequence() {
    let mut value = valid_test_struct();
    value.arry = None;
    assert_eq!(validate_tagged(&value), Ok(()));

    struct Holder {
        items: Option<Vec<i32>>,
    }
    validatable!(Holder { items as "Items": "[]int,required" });
    let err = validate_tagged(&Holder { items: None }).unwrap_err();
    assert_eq!(
        only_error(&err, "Items").message,
        "required: field Items was nil but is required"
    );
}

// ─── Skipping ───────────────────────────────────────────────────────────────

#[test]
fn skipped_and_unlisted_fields_are_ignored() {
    struct Loose {
        kept: i32,
        dashed: i32,
        blank: i32,
        unlisted: i32,
    }
    validatable!(Loose {
        kept as "Kept": "int,max=10",
        dashed as "Dashed": "-",
        blank as "Blank": "",
    });
    let value = Loose {
        kept: 11,
        dashed: 11,
        blank: 11,
        unlisted: 11,
    };
    let _ = value.unlisted;
    let err = validate_tagged(&value).unwrap_err();
    assert_eq!(paths(&err), vec!["Kept"]);
}

// ─── Registry failures ──────────────────────────────────────────────────────

#[test]
fn unknown_checker_is_reported_without_aborting() {
    struct Odd {
        first: i32,
        mystery: String,
        last: i32,
    }
    validatable!(Odd {
        first as "First": "int,max=1",
        mystery as "Mystery": "notarealvalidator,required",
        last as "Last": "int,max=1",
    });

    let err = validate_tagged(&Odd {
        first: 2,
        mystery: String::new(),
        last: 2,
    })
    .unwrap_err();
    assert_eq!(paths(&err), vec!["First", "Last", "Mystery"]);
    let error = only_error(&err, "Mystery");
    assert!(error.message.contains("not registered"));
    assert_eq!(
        error.message,
        "Validator of type notarealvalidator is not registered."
    );
}

#[test]
fn bare_array_prefix_names_the_written_checker() {
    struct Blank {
        values: Vec<i32>,
    }
    validatable!(Blank { values as "Values": "[]" });

    let err = validate_tagged(&Blank { values: vec![1] }).unwrap_err();
    assert_eq!(
        only_error(&err, "Values").message,
        "Validator of type [] is not registered."
    );
}

#[test]
fn bad_option_value_skips_only_that_field() {
    struct Misconfigured {
        broken: i32,
        fine: i32,
    }
    validatable!(Misconfigured {
        broken as "Broken": "int,min=abc,max=1",
        fine as "Fine": "int,max=1",
    });

    let err = validate_tagged(&Misconfigured {
        broken: 1000,
        fine: 2,
    })
    .unwrap_err();
    assert_eq!(paths(&err), vec!["Broken", "Fine"]);
    let broken = only_error(&err, "Broken");
    assert_eq!(broken.kind, FailureKind::Config);
    assert!(broken.message.contains("min"), "{}", broken.message);
}

#[test]
fn unknown_options_are_ignored() {
    struct Extra {
        value: i32,
    }
    validatable!(Extra { value as "Value": "int,min=0,colour=blue,loud,max=10" });
    assert_eq!(validate_tagged(&Extra { value: 5 }), Ok(()));
}

// ─── Sequences ──────────────────────────────────────────────────────────────

#[test]
fn sequence_elements_are_indexed() {
    let mut value = valid_test_struct();
    value.arry = Some(vec![1, 2, 999, -4]);
    let err = validate_tagged(&value).unwrap_err();
    assert_eq!(paths(&err), vec!["Arry[2]", "Arry[3]"]);
    assert!(only_error(&err, "Arry[2]").has_prefix("max:"));
    assert!(only_error(&err, "Arry[3]").has_prefix("min:"));
}

#[test]
fn nested_sequences_chain_indexes() {
    struct Grid {
        cells: Vec<Vec<i32>>,
    }
    validatable!(Grid { cells as "Items": "[][]int,max=9" });

    let err = validate_tagged(&Grid {
        cells: vec![vec![1, 10], vec![3], vec![10, 4, 11]],
    })
    .unwrap_err();
    assert_eq!(paths(&err), vec!["Items[0][1]", "Items[2][0]", "Items[2][2]"]);
}

#[test]
fn sequences_of_every_container_kind() {
    struct Bags {
        array: [i32; 3],
        deque: VecDeque<i32>,
        json: serde_json::Value,
    }
    validatable!(Bags {
        array as "Array": "[]int,max=1",
        deque as "Deque": "[]int,max=1",
        json as "Json": "[]int,max=1",
    });
    let err = validate_tagged(&Bags {
        array: [0, 1, 2],
        deque: VecDeque::from(vec![5]),
        json: serde_json::json!([1, 1, 7]),
    })
    .unwrap_err();
    assert_eq!(paths(&err), vec!["Array[2]", "Deque[0]", "Json[2]"]);
}

#[test]
fn nil_elements_respect_required() {
    struct Holder {
        loose: Vec<Option<i32>>,
        strict: Vec<Option<i32>>,
    }
    validatable!(Holder {
        loose as "Loose": "[]int,max=5",
        strict as "Strict": "[]int,required,max=5",
    });
    let err = validate_tagged(&Holder {
        loose: vec![Some(1), None],
        strict: vec![Some(1), None, Some(6)],
    })
    .unwrap_err();
    assert_eq!(paths(&err), vec!["Strict[1]", "Strict[2]"]);
    assert_eq!(
        only_error(&err, "Strict[1]").message,
        "required: field Strict[1] was nil but is required"
    );
}

#[test]
fn sequence_of_records() {
    struct Order {
        lines: Vec<Details>,
    }
    validatable!(Order { lines as "Lines": "[]struct" });

    let err = validate_tagged(&Order {
        lines: vec![
            Details::default(),
            Details {
                name: "n".repeat(60),
                value: 200,
            },
        ],
    })
    .unwrap_err();
    assert_eq!(paths(&err), vec!["Lines[1].Name", "Lines[1].Value"]);
}

#[test]
fn array_depth_on_a_scalar_is_a_type_error() {
    struct Flat {
        value: i32,
    }
    validatable!(Flat { value as "Value": "[]int,max=1" });

    let err = validate_tagged(&Flat { value: 5 }).unwrap_err();
    let error = only_error(&err, "Value");
    assert_eq!(error.kind, FailureKind::Type);
    assert!(error.message.contains("array level"), "{}", error.message);
}

#[test]
fn too_few_array_prefixes_hand_the_sequence_to_the_checker() {
    struct Grid {
        cells: Vec<Vec<i32>>,
    }
    validatable!(Grid { cells as "Cells": "[]int" });

    let err = validate_tagged(&Grid {
        cells: vec![vec![1]],
    })
    .unwrap_err();
    assert_eq!(only_error(&err, "Cells[0]").kind, FailureKind::Type);
}

// ─── Properties ─────────────────────────────────────────────────────────────

#[test]
fn validation_is_idempotent() {
    let mut value = valid_test_struct();
    value.age = -3;
    value.arry = Some(vec![500, 1]);
    value.name = "ab".to_string();
    let first = validate_tagged(&value);
    let second = validate_tagged(&value);
    assert!(first.is_err());
    assert_eq!(first, second);
}

#[test]
fn concurrent_validations_do_not_interfere() {
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                scope.spawn(move || {
                    let mut value = valid_test_struct();
                    value.age = 150 + i;
                    validate_tagged(&value)
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap();
            if i == 0 {
                assert_eq!(result, Ok(()));
            } else {
                assert_eq!(paths(&result.unwrap_err()), vec!["Age"]);
            }
        }
    });
}

// ─── Concrete scenarios ─────────────────────────────────────────────────────

#[test]
fn scenario_blank_required_string() {
    struct S {
        name: String,
    }
    validatable!(S { name as "Name": "string,required,min=3,max=10" });
    let err = validate_tagged(&S {
        name: String::new(),
    })
    .unwrap_err();
    assert!(only_error(&err, "Name").has_prefix("required:"));
}

#[test]
fn scenario_int_above_max() {
    struct S {
        age: i32,
    }
    validatable!(S { age as "Age": "int,min=0,max=150" });
    let err = validate_tagged(&S { age: 200 }).unwrap_err();
    assert!(only_error(&err, "Age").has_prefix("max:"));
}

#[test]
fn scenario_nil_uuid_allowed() {
    struct S {
        id: Uuid,
    }
    validatable!(S { id as "ID": "uuid,required,allowemptyuuid" });
    assert_eq!(validate_tagged(&S { id: Uuid::nil() }), Ok(()));
}

#[test]
fn scenario_nil_uuid_rejected() {
    struct S {
        id: Uuid,
    }
    validatable!(S { id as "ID": "uuid" });
    let err = validate_tagged(&S { id: Uuid::nil() }).unwrap_err();
    assert!(only_error(&err, "ID").has_prefix("no empty:"));
}

#[test]
fn scenario_sequence_element_above_max() {
    struct S {
        scores: Vec<i32>,
    }
    validatable!(S { scores as "Scores": "[]int,min=0,max=150" });
    let err = validate_tagged(&S {
        scores: vec![1, 2, 999],
    })
    .unwrap_err();
    assert_eq!(paths(&err), vec!["Scores[2]"]);
    assert!(only_error(&err, "Scores[2]").has_prefix("max:"));
}

#[test]
fn scenario_malformed_email() {
    struct S {
        email: String,
    }
    validatable!(S { email as "Email": "email,required" });
    let err = validate_tagged(&S {
        email: "not-an-email".to_string(),
    })
    .unwrap_err();
    assert!(only_error(&err, "Email").has_prefix("invalid:"));
}

// ─── Units ──────────────────────────────────────────────────────────────────

#[test]
fn missing_unit_is_a_setup_error() {
    let err = validate_unit(None).unwrap_err();
    assert_eq!(err, UnitError::NoUnit);
    assert_eq!(err.to_string(), "no unit provided");
    assert!(err.validation().is_none());
}

#[test]
fn unit_defaults_to_the_value_name() {
    let checker = IntChecker {
        min: None,
        max: Some(3),
    };
    let unit = Unit::new(&5i32).with_checker(&checker);
    let err = validate_unit(Some(&unit)).unwrap_err();
    let report = err.validation().unwrap();
    assert_eq!(paths(report), vec!["value"]);
    assert!(report.data_type.is_none());
    assert!(err.to_string().starts_with("value validation failed:\tvalue: max:"));
}

#[test]
fn unit_without_checker_walks_record_fields() {
    let detail = Details {
        name: String::new(),
        value: 500,
    };
    let unit = Unit::new(&detail);
    let err = validate_unit(Some(&unit)).unwrap_err();
    assert_eq!(paths(err.validation().unwrap()), vec!["Value"]);
}

#[test]
fn unit_required_nil() {
    let checker = StringChecker::new();
    let missing: Option<String> = None;
    let unit = Unit::new(&missing)
        .with_name("nickname")
        .with_checker(&checker)
        .with_required(true);
    let err = validate_unit(Some(&unit)).unwrap_err();
    assert_eq!(
        only_error(err.validation().unwrap(), "nickname").message,
        "required: field nickname was nil but is required"
    );

    let unit = unit.with_required(false);
    assert_eq!(validate_unit(Some(&unit)), Ok(()));
}

#[test]
fn unit_over_a_sequence_of_records_keeps_indexes() {
    let lines = vec![
        Details::default(),
        Details {
            name: String::new(),
            value: 151,
        },
        Details {
            name: String::new(),
            value: -1,
        },
    ];
    let unit = Unit::new(&lines).with_name("lines").with_array_depth(1);
    let err = validate_unit(Some(&unit)).unwrap_err();
    let report = err.validation().unwrap();
    assert_eq!(paths(report), vec!["lines[1].Value", "lines[2].Value"]);
    assert!(only_error(report, "lines[1].Value").has_prefix("max:"));
    assert!(only_error(report, "lines[2].Value").has_prefix("min:"));
}

#[test]
fn unit_over_json_array() {
    let checker = IntChecker {
        min: Some(0),
        max: Some(10),
    };
    let data = serde_json::json!([[1, 2], [3, 40]]);
    let unit = Unit::new(&data)
        .with_name("matrix")
        .with_checker(&checker)
        .with_array_depth(2);
    let err = validate_unit(Some(&unit)).unwrap_err();
    assert_eq!(paths(err.validation().unwrap()), vec!["matrix[1][1]"]);
}

#[test]
fn isolated_engine_ignores_global_registrations() {
    let registry = Registry::new();
    let engine = Engine::new(&registry);
    let err = engine.validate_tagged(&valid_test_struct()).unwrap_err();
    assert!(
        err.errors
            .values()
            .flatten()
            .all(|e| e.kind == FailureKind::NotRegistered)
    );
    assert!(err.contains_path("Age"));
    assert!(err.contains_path("Detail.Value"));
}
