use crate::core::content::Reply;
use crate::core::error::HubSpotError;
use crate::domain::{ObjectType, OptionInput, PropertyCreate, PropertyDefinition, PropertyUpdate};

use super::{handle_hubspot_errors, HubSpotClient};

fn properties_path(object_type: ObjectType) -> [&'static str; 4] {
    ["crm", "v3", "properties", object_type.as_str()]
}

fn property_path(object_type: ObjectType, property_name: &str) -> [&str; 5] {
    ["crm", "v3", "properties", object_type.as_str(), property_name]
}

/// Property schema operations on the CRM properties API.
#[derive(Clone)]
pub struct PropertyClient {
    api: HubSpotClient,
}

impl PropertyClient {
    pub fn new(api: HubSpotClient) -> Self {
        Self { api }
    }

    pub async fn get_property(
        &self,
        object_type: ObjectType,
        property_name: &str,
    ) -> Result<Reply, HubSpotError> {
        handle_hubspot_errors(
            "properties.get",
            self.fetch_property(object_type, property_name).await,
        )
    }

    pub async fn fetch_property(
        &self,
        object_type: ObjectType,
        property_name: &str,
    ) -> Result<PropertyDefinition, HubSpotError> {
        self.api
            .get(
                "properties.get",
                &property_path(object_type, property_name),
                &[("archived", "false".to_string())],
            )
            .await
    }

    /// Update a property definition. `options`, when given, replaces the
    /// option list; everything else comes from `update`.
    pub async fn update_property(
        &self,
        object_type: ObjectType,
        property_name: &str,
        options: Option<Vec<OptionInput>>,
        mut update: PropertyUpdate,
    ) -> Result<Reply, HubSpotError> {
        if options.is_some() {
            update.options = options;
        }
        let path = property_path(object_type, property_name);
        let res: Result<PropertyDefinition, _> = self.api.patch("properties.update", &path, &update).await;
        handle_hubspot_errors("properties.update", res)
    }

    pub async fn create_property(
        &self,
        object_type: ObjectType,
        create: &PropertyCreate,
    ) -> Result<Reply, HubSpotError> {
        let res: Result<PropertyDefinition, _> = self
            .api
            .post("properties.create", &properties_path(object_type), create)
            .await;
        handle_hubspot_errors("properties.create", res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::{json, Value};

    fn definition_json(name: &str) -> Value {
        json!({
            "name": name,
            "label": "Status",
            "type": "enumeration",
            "fieldType": "select",
            "groupName": "contactinformation",
            "description": "",
            "options": [{"label": "A", "value": "a", "displayOrder": 0, "hidden": false}],
            "createdAt": "2019-08-06T02:43:14.491Z",
            "updatedAt": "2024-02-01T10:00:00Z",
            "hubspotDefined": false,
            "modificationMetadata": {"archivable": true, "readOnlyDefinition": false, "readOnlyValue": false}
        })
    }

    fn client(server: &MockServer) -> PropertyClient {
        PropertyClient::new(HubSpotClient::new(server.base_url(), "pat-test"))
    }

    #[tokio::test]
    async fn get_property_returns_normalized_definition() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/crm/v3/properties/contacts/email")
                .query_param("archived", "false");
            then.status(200).json_body(definition_json("email"));
        });

        let reply = client(&server).get_property(ObjectType::Contacts, "email").await.unwrap();
        m.assert();
        let v: Value = serde_json::from_str(&reply.text()).unwrap();
        assert_eq!(v["name"], "email");
        assert_eq!(v["field_type"], "select");
        assert_eq!(v["created_at"], "2019-08-06T02:43:14.491Z");
        assert_eq!(v["updated_at"], "2024-02-01T10:00:00.000Z");
    }

    #[tokio::test]
    async fn update_with_only_options_sends_only_options() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(PATCH)
                .path("/crm/v3/properties/contacts/status")
                .json_body(json!({"options": [{"label": "A", "value": "a"}]}));
            then.status(200).json_body(definition_json("status"));
        });

        let options = vec![OptionInput {
            label: "A".into(),
            value: "a".into(),
            description: None,
            display_order: None,
            hidden: None,
        }];
        let reply = client(&server)
            .update_property(ObjectType::Contacts, "status", Some(options), PropertyUpdate::default())
            .await
            .unwrap();
        m.assert_hits(1);
        assert!(!reply.is_failure());
    }

    #[tokio::test]
    async fn update_merges_extra_attributes() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(PATCH)
                .path("/crm/v3/properties/companies/tier")
                .json_body(json!({"label": "Tier", "options": [], "showCurrencySymbol": false}));
            then.status(200).json_body(definition_json("tier"));
        });

        let mut update = PropertyUpdate { label: Some("Tier".into()), ..Default::default() };
        update.extra.insert("showCurrencySymbol".into(), Value::Bool(false));
        client(&server)
            .update_property(ObjectType::Companies, "tier", Some(vec![]), update)
            .await
            .unwrap();
        m.assert();
    }

    #[tokio::test]
    async fn create_posts_definition() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST).path("/crm/v3/properties/contacts").json_body(json!({
                "name": "status",
                "label": "Status",
                "type": "enumeration",
                "fieldType": "select",
                "groupName": "contactinformation",
                "options": [{"label": "A", "value": "a", "displayOrder": 1}]
            }));
            then.status(201).json_body(definition_json("status"));
        });

        let mut create = PropertyCreate::new("status", "Status", "enumeration", "select", "contactinformation");
        create.options = Some(vec![OptionInput {
            label: "A".into(),
            value: "a".into(),
            description: None,
            display_order: Some(1),
            hidden: None,
        }]);
        let reply = client(&server).create_property(ObjectType::Contacts, &create).await.unwrap();
        m.assert();
        let v: Value = serde_json::from_str(&reply.text()).unwrap();
        assert_eq!(v["name"], "status");
    }

    #[tokio::test]
    async fn missing_property_is_failure_reply() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/crm/v3/properties/companies/nope");
            then.status(404).json_body(json!({
                "status": "error",
                "message": "Unable to find property nope",
                "correlationId": "abc",
                "category": "OBJECT_NOT_FOUND"
            }));
        });

        let reply = client(&server).get_property(ObjectType::Companies, "nope").await.unwrap();
        match reply {
            Reply::Failure(f) => {
                assert_eq!(f.status, 404);
                assert_eq!(f.correlation_id.as_deref(), Some("abc"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn property_name_stays_one_segment() {
        let server = MockServer::start();
        let escaped = server.mock(|when, then| {
            when.path("/crm/v3/properties/companies");
            then.status(200).json_body(definition_json("x"));
        });
        let named = server.mock(|when, then| {
            when.method(PATCH).path_contains("/crm/v3/properties/contacts/status");
            then.status(404).json_body(json!({"status": "error", "message": "no such property"}));
        });

        let reply = client(&server)
            .update_property(ObjectType::Contacts, "status/../../companies", Some(vec![]), PropertyUpdate::default())
            .await
            .unwrap();
        assert!(reply.is_failure());
        escaped.assert_hits(0);
        named.assert_hits(1);
    }

    #[tokio::test]
    async fn unreachable_host_propagates_transport_error() {
        let cli = PropertyClient::new(HubSpotClient::new("http://127.0.0.1:9", "pat-test"));
        let err = cli.get_property(ObjectType::Contacts, "email").await.unwrap_err();
        assert!(matches!(err, HubSpotError::Transport(_)));
    }
}
