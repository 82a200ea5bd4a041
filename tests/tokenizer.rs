use clickstream::tokenizer::{column, split_fields, COLUMNS};

const LINE: &str = "2019-11-01 00:00:00 UTC,view,1003461,2053013555631882655,electronics.smartphone,xiaomi,489.07,520088904,4d3b30da";

#[test]
fn full_line_splits_into_nine_fields() {
    let f = split_fields::<COLUMNS>(LINE);
    assert_eq!(f[column::EVENT_TIME], "2019-11-01 00:00:00 UTC");
    assert_eq!(f[column::EVENT_TYPE], "view");
    assert_eq!(f[column::PRODUCT_ID], "1003461");
    assert_eq!(f[column::CATEGORY_ID], "2053013555631882655");
    assert_eq!(f[column::CATEGORY_CODE], "electronics.smartphone");
    assert_eq!(f[column::BRAND], "xiaomi");
    assert_eq!(f[column::PRICE], "489.07");
    assert_eq!(f[column::USER_ID], "520088904");
    assert_eq!(f[column::USER_SESSION], "4d3b30da");
}

#[test]
fn short_line_leaves_trailing_fields_empty() {
    let f = split_fields::<COLUMNS>("2019-11-01 00:00:00 UTC,view,42");
    assert_eq!(&f[..3], &["2019-11-01 00:00:00 UTC", "view", "42"]);
    assert!(f[3..].iter().all(|s| s.is_empty()));
}

#[test]
fn empty_interior_fields_are_preserved() {
    let f = split_fields::<COLUMNS>("t,cart,1,2,,,3.5,9,");
    assert_eq!(f, ["t", "cart", "1", "2", "", "", "3.5", "9", ""]);
}

#[test]
fn extra_fields_are_ignored() {
    let f = split_fields::<3>("a,b,c,d,e");
    assert_eq!(f, ["a", "b", "c"]);
}

#[test]
fn empty_line_yields_all_empty() {
    assert_eq!(split_fields::<4>(""), ["", "", "", ""]);
}

#[test]
fn fields_borrow_from_the_line() {
    let f = split_fields::<COLUMNS>(LINE);
    let start = LINE.as_ptr() as usize;
    let end = start + LINE.len();
    for field in f {
        let p = field.as_ptr() as usize;
        assert!(p >= start && p <= end);
    }
}
