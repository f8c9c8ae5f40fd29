use dicomix_core::dictionary::StubDataDictionary;
use dicomix_core::{DataDictionary, DataSet, Element, Tag, VrClass, VR};

#[test]
fn can_use_reexports() {
    // can refer to `DataSet`, `Element`, `Tag` and `VR` from the crate root
    let buffer = "Simões^João".as_bytes();
    let set = DataSet::from_element_iter(
        buffer,
        [Element::new("x00100010", Some(VR::PN.into()), buffer.len() as u32, 0)],
    );
    let elem = set.get("x00100010").unwrap();
    assert_eq!(elem.parsed_tag(), Some(Tag(0x0010, 0x0010)));
    assert_eq!(set.value_bytes(elem), Some(buffer));
    assert_eq!(VrClass::of_opt(elem.vr), VrClass::Text);

    // can call `by_tag` and `by_key`
    assert_eq!(StubDataDictionary.by_tag(Tag(0x0010, 0x0010)), None);
    assert_eq!(StubDataDictionary.by_key("(0010,0010)"), None);
}
