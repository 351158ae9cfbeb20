use rolo_clients::{Clients, MemoryGateway, init};
use rolo_kernel::domain::config::{DirectoryConfig, PhoneFormat};
use std::sync::Arc;

#[test]
fn init_creates_slice() {
    let config = DirectoryConfig {
        page_size: 25,
        phone_format: PhoneFormat::Strict,
        ..DirectoryConfig::default()
    };
    let slice = init(&config, Arc::new(MemoryGateway::new())).expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<Clients>());

    let clients = slice.downcast_ref::<Clients>().expect("slice holds Clients");
    assert_eq!(clients.page_size, 25);
    assert_eq!(clients.rules.phone_format(), PhoneFormat::Strict);
}

#[test]
fn zero_page_size_is_rejected() {
    let config = DirectoryConfig { page_size: 0, ..DirectoryConfig::default() };
    assert!(init(&config, Arc::new(MemoryGateway::new())).is_err());
}
