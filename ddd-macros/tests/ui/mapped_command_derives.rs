use ddd_application::auto_mapping::MappedCommand;
use ddd_application::command::Command;
use ddd_macros::mapped_command;

#[mapped_command(name = "billing.close")]
#[derive(Clone, PartialEq)]
struct CloseInvoice {
    number: String,
}

#[mapped_command]
struct Heartbeat {}

fn main() {
    let cmd = CloseInvoice {
        number: "INV-7".into(),
    };
    assert_eq!(cmd.clone(), cmd);
    assert_eq!(format!("{cmd:?}"), r#"CloseInvoice { number: "INV-7" }"#);
    assert_eq!(CloseInvoice::NAME, "billing.close");

    let beat = Heartbeat {};
    assert!(beat.mapped_properties().is_empty());
    assert!(beat.property_values().is_empty());
}
