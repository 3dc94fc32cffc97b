use ddd_application::auto_mapping::{MappedCommand, MappingTarget, ParamType};
use ddd_application::command::Command;
use ddd_macros::mapped_command;

#[mapped_command]
pub struct RenameUser {
    id: u64,
    #[mapping(rename = "display_name")]
    name: String,
    #[mapping(skip)]
    request_id: String,
}

fn main() {
    let cmd = RenameUser {
        id: 42,
        name: "alice".into(),
        request_id: "req-1".into(),
    };

    assert_eq!(RenameUser::NAME, "RenameUser");
    assert_eq!(cmd.mapping_target(), MappingTarget::None);

    let props = cmd.mapped_properties();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].name(), "id");
    assert_eq!(props[0].ty(), ParamType::of::<u64>());
    assert_eq!(props[1].name(), "display_name");
    assert_eq!(props[1].ty(), ParamType::of::<String>());

    let values = cmd.property_values();
    assert_eq!(values[0].downcast_ref::<u64>(), Some(&42));
    assert_eq!(values[1].downcast_ref::<String>().map(String::as_str), Some("alice"));

    // 跳过的字段仍保留在结构体中
    assert_eq!(cmd.clone().request_id, "req-1");
}
