use rolo_domain::constants::{API_PREFIX, CLIENT_TABLE, CLIENTS_PATH};

#[test]
fn resource_paths_match_the_public_api() {
    assert_eq!(format!("{API_PREFIX}{CLIENTS_PATH}"), "/api/v1/clientes");
    assert_eq!(CLIENT_TABLE, "client");
}
