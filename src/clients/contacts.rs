use crate::core::content::Reply;
use crate::core::error::HubSpotError;
use crate::domain::contact::{property_text, ContactInput};
use crate::domain::{
    Contact, ContactProperties, CreateContactOutcome, Filter, FilterGroup, SearchRequest,
    SearchResponse, SortDirection,
};

use super::{handle_hubspot_errors, HubSpotClient};

const CONTACTS: [&str; 4] = ["crm", "v3", "objects", "contacts"];
const SEARCH: [&str; 5] = ["crm", "v3", "objects", "contacts", "search"];

fn contact_path(contact_id: &str) -> [&str; 5] {
    ["crm", "v3", "objects", "contacts", contact_id]
}

/// Properties fetched for the "recently active" listing.
pub const RECENT_PROPERTIES: [&str; 7] = [
    "firstname",
    "lastname",
    "email",
    "phone",
    "company",
    "hs_lastmodifieddate",
    "lastmodifieddate",
];

/// Contact operations on the CRM objects API.
#[derive(Clone)]
pub struct ContactClient {
    api: HubSpotClient,
}

impl ContactClient {
    pub fn new(api: HubSpotClient) -> Self {
        Self { api }
    }

    /// Most recently modified contacts, newest first.
    pub async fn get_recent(&self, limit: u32) -> Result<Reply, HubSpotError> {
        handle_hubspot_errors("contacts.get_recent", self.fetch_recent(limit).await)
    }

    pub async fn fetch_recent(&self, limit: u32) -> Result<Vec<Contact>, HubSpotError> {
        let resp: SearchResponse = self
            .api
            .post("contacts.search", &SEARCH, &recent_search_request(limit))
            .await?;
        Ok(resp.results)
    }

    /// A single contact. `properties = None` lets HubSpot pick its defaults.
    pub async fn get_by_id(
        &self,
        contact_id: &str,
        properties: Option<&[String]>,
    ) -> Result<Reply, HubSpotError> {
        handle_hubspot_errors("contacts.get_by_id", self.fetch_by_id(contact_id, properties).await)
    }

    pub async fn fetch_by_id(
        &self,
        contact_id: &str,
        properties: Option<&[String]>,
    ) -> Result<Contact, HubSpotError> {
        let mut query = vec![("archived", "false".to_string())];
        if let Some(props) = properties.filter(|p| !p.is_empty()) {
            query.push(("properties", props.join(",")));
        }
        self.api
            .get("contacts.get_by_id", &contact_path(contact_id), &query)
            .await
    }

    pub async fn update(
        &self,
        contact_id: &str,
        properties: &ContactProperties,
    ) -> Result<Reply, HubSpotError> {
        let res: Result<Contact, _> = self
            .api
            .patch(
                "contacts.update",
                &contact_path(contact_id),
                &ContactInput { properties },
            )
            .await;
        handle_hubspot_errors("contacts.update", res)
    }

    /// Create a contact unless one with the same name (and company) exists.
    pub async fn create_contact(&self, properties: &ContactProperties) -> Result<Reply, HubSpotError> {
        handle_hubspot_errors("contacts.create", self.create_guarded(properties).await)
    }

    pub async fn create_guarded(
        &self,
        properties: &ContactProperties,
    ) -> Result<CreateContactOutcome, HubSpotError> {
        let firstname = properties.get("firstname").and_then(property_text);
        let lastname = properties.get("lastname").and_then(property_text);

        if let (Some(firstname), Some(lastname)) = (firstname, lastname) {
            let company = properties
                .get("company")
                .and_then(property_text)
                .filter(|c| !c.is_empty());
            if let Some(existing) = self
                .find_existing_contact(&firstname, &lastname, company.as_deref())
                .await?
            {
                tracing::info!(contact_id = %existing.id, "contact already exists; skipping create");
                return Ok(CreateContactOutcome::AlreadyExists(existing));
            }
        }

        let created: Contact = self
            .api
            .post("contacts.create", &CONTACTS, &ContactInput { properties })
            .await?;
        tracing::info!(contact_id = %created.id, "contact created");
        Ok(CreateContactOutcome::Created(created))
    }

    /// First contact matching first AND last name (AND company, when given).
    pub async fn find_existing_contact(
        &self,
        firstname: &str,
        lastname: &str,
        company: Option<&str>,
    ) -> Result<Option<Contact>, HubSpotError> {
        let req = duplicate_search_request(firstname, lastname, company);
        let resp: SearchResponse = self.api.post("contacts.search", &SEARCH, &req).await?;
        if resp.total == 0 {
            return Ok(None);
        }
        Ok(resp.results.into_iter().next())
    }
}

pub fn recent_search_request(limit: u32) -> SearchRequest {
    SearchRequest::default()
        .sorted_by("lastmodifieddate", SortDirection::Descending)
        .with_limit(limit)
        .with_properties(RECENT_PROPERTIES)
}

pub fn duplicate_search_request(firstname: &str, lastname: &str, company: Option<&str>) -> SearchRequest {
    let mut group = FilterGroup {
        filters: vec![Filter::eq("firstname", firstname), Filter::eq("lastname", lastname)],
    };
    if let Some(company) = company {
        group.filters.push(Filter::eq("company", company));
    }
    SearchRequest::filtered(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::{json, Value};

    const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";
    const SEARCH_PATH: &str = "/crm/v3/objects/contacts/search";

    fn props(v: Value) -> ContactProperties {
        v.as_object().unwrap().clone()
    }

    fn contact_json(id: &str, first: &str, last: &str) -> Value {
        json!({
            "id": id,
            "properties": {
                "firstname": first,
                "lastname": last,
                "createdate": "2024-05-01T12:00:00Z",
                "lastmodifieddate": "1714564800000"
            },
            "createdAt": "2024-05-01T12:00:00Z",
            "updatedAt": "2024-05-02T08:30:00.1Z",
            "archived": false
        })
    }

    fn client(server: &MockServer) -> ContactClient {
        ContactClient::new(HubSpotClient::new(server.base_url(), "pat-test"))
    }

    #[tokio::test]
    async fn existing_match_returns_already_exists_without_create() {
        let server = MockServer::start();
        let search = server.mock(|when, then| {
            when.method(POST).path(SEARCH_PATH).json_body(json!({
                "filterGroups": [{"filters": [
                    {"propertyName": "firstname", "operator": "EQ", "value": "Jane"},
                    {"propertyName": "lastname", "operator": "EQ", "value": "Doe"}
                ]}]
            }));
            then.status(200).json_body(json!({
                "total": 2,
                "results": [contact_json("11", "Jane", "Doe"), contact_json("12", "Jane", "Doe")]
            }));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path(CONTACTS_PATH);
            then.status(201).json_body(contact_json("99", "Jane", "Doe"));
        });

        let out = client(&server)
            .create_guarded(&props(json!({"firstname": "Jane", "lastname": "Doe"})))
            .await
            .unwrap();

        search.assert();
        create.assert_hits(0);
        match &out {
            CreateContactOutcome::AlreadyExists(c) => assert_eq!(c.id, "11"),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["already_exists"], true);
        assert_eq!(v["contact"]["id"], "11");
    }

    #[tokio::test]
    async fn company_filter_is_added_to_name_filters() {
        let server = MockServer::start();
        let search = server.mock(|when, then| {
            when.method(POST).path(SEARCH_PATH).json_body(json!({
                "filterGroups": [{"filters": [
                    {"propertyName": "firstname", "operator": "EQ", "value": "Jane"},
                    {"propertyName": "lastname", "operator": "EQ", "value": "Doe"},
                    {"propertyName": "company", "operator": "EQ", "value": "Acme"}
                ]}]
            }));
            then.status(200).json_body(json!({"total": 0, "results": []}));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path(CONTACTS_PATH);
            then.status(201).json_body(contact_json("7", "Jane", "Doe"));
        });

        let out = client(&server)
            .create_guarded(&props(json!({"firstname": "Jane", "lastname": "Doe", "company": "Acme"})))
            .await
            .unwrap();

        search.assert();
        create.assert();
        assert!(matches!(out, CreateContactOutcome::Created(_)));
    }

    #[tokio::test]
    async fn missing_lastname_skips_duplicate_search() {
        let server = MockServer::start();
        let search = server.mock(|when, then| {
            when.method(POST).path(SEARCH_PATH);
            then.status(200).json_body(json!({"total": 0, "results": []}));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path(CONTACTS_PATH)
                .json_body(json!({"properties": {"firstname": "Jane", "email": "jane@example.com"}}));
            then.status(201).json_body(contact_json("8", "Jane", ""));
        });

        client(&server)
            .create_guarded(&props(json!({"firstname": "Jane", "email": "jane@example.com"})))
            .await
            .unwrap();

        search.assert_hits(0);
        create.assert();
    }

    #[tokio::test]
    async fn missing_firstname_skips_duplicate_search() {
        let server = MockServer::start();
        let search = server.mock(|when, then| {
            when.method(POST).path(SEARCH_PATH);
            then.status(200).json_body(json!({"total": 0, "results": []}));
        });
        server.mock(|when, then| {
            when.method(POST).path(CONTACTS_PATH);
            then.status(201).json_body(contact_json("9", "", "Doe"));
        });

        client(&server)
            .create_guarded(&props(json!({"lastname": "Doe", "firstname": null})))
            .await
            .unwrap();
        search.assert_hits(0);
    }

    #[tokio::test]
    async fn jane_doe_without_match_searches_then_creates() {
        let server = MockServer::start();
        let search = server.mock(|when, then| {
            when.method(POST).path(SEARCH_PATH);
            then.status(200).json_body(json!({"total": 0, "results": []}));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path(CONTACTS_PATH)
                .json_body(json!({"properties": {"firstname": "Jane", "lastname": "Doe"}}));
            then.status(201).json_body(contact_json("42", "Jane", "Doe"));
        });

        let reply = client(&server)
            .create_contact(&props(json!({"firstname": "Jane", "lastname": "Doe"})))
            .await
            .unwrap();

        search.assert_hits(1);
        create.assert_hits(1);
        let v: Value = serde_json::from_str(&reply.text()).unwrap();
        assert_eq!(v["id"], "42");
        assert!(v.get("already_exists").is_none());
        assert_eq!(v["created_at"], "2024-05-01T12:00:00.000Z");
        assert_eq!(v["updated_at"], "2024-05-02T08:30:00.100Z");
        assert_eq!(v["properties"]["lastmodifieddate"], "2024-05-01T12:00:00.000Z");
    }

    #[tokio::test]
    async fn create_api_error_is_normalized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(CONTACTS_PATH);
            then.status(409).json_body(json!({
                "status": "error",
                "message": "Contact already exists. Existing ID: 5",
                "category": "CONFLICT"
            }));
        });

        let reply = client(&server)
            .create_contact(&props(json!({"email": "x@example.com"})))
            .await
            .unwrap();
        assert!(reply.is_failure());
        let v: Value = serde_json::from_str(&reply.text()).unwrap();
        assert_eq!(v["error"]["status"], 409);
        assert_eq!(v["error"]["category"], "CONFLICT");
    }

    #[tokio::test]
    async fn get_recent_sorts_by_last_modified() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST).path(SEARCH_PATH).json_body(json!({
                "sorts": [{"propertyName": "lastmodifieddate", "direction": "DESCENDING"}],
                "properties": RECENT_PROPERTIES,
                "limit": 3
            }));
            then.status(200).json_body(json!({
                "total": 1,
                "results": [contact_json("1", "Ada", "Lovelace")],
                "paging": {"next": {"after": "1"}}
            }));
        });

        let reply = client(&server).get_recent(3).await.unwrap();
        m.assert();
        let v: Value = serde_json::from_str(&reply.text()).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 1);
        assert_eq!(v[0]["properties"]["createdate"], "2024-05-01T12:00:00.000Z");
    }

    #[tokio::test]
    async fn get_by_id_passes_property_list() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path(format!("{CONTACTS_PATH}/123"))
                .query_param("archived", "false")
                .query_param("properties", "email,phone");
            then.status(200).json_body(contact_json("123", "Grace", "Hopper"));
        });

        let props = vec!["email".to_string(), "phone".to_string()];
        let contact = client(&server).fetch_by_id("123", Some(&props)).await.unwrap();
        m.assert();
        assert_eq!(contact.id, "123");
    }

    #[tokio::test]
    async fn get_by_id_not_found_is_failure_reply() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(format!("{CONTACTS_PATH}/404"));
            then.status(404).json_body(json!({"status": "error", "message": "not found", "category": "OBJECT_NOT_FOUND"}));
        });

        let reply = client(&server).get_by_id("404", None).await.unwrap();
        assert!(reply.is_failure());
    }

    #[tokio::test]
    async fn update_patches_properties() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(PATCH)
                .path(format!("{CONTACTS_PATH}/55"))
                .json_body(json!({"properties": {"phone": "555-0100"}}));
            then.status(200).json_body(contact_json("55", "Alan", "Turing"));
        });

        let reply = client(&server)
            .update("55", &props(json!({"phone": "555-0100"})))
            .await
            .unwrap();
        m.assert();
        assert!(!reply.is_failure());
    }

    #[tokio::test]
    async fn update_cannot_escape_the_contact_path() {
        let server = MockServer::start();
        let escaped = server.mock(|when, then| {
            when.path("/crm/v3/x");
            then.status(200).json_body(contact_json("x", "", ""));
        });
        let escaped_property = server.mock(|when, then| {
            when.path("/crm/v3/properties/contacts/email");
            then.status(200).json_body(json!({}));
        });
        let contact = server.mock(|when, then| {
            when.method(PATCH).path_contains("/crm/v3/objects/contacts/1");
            then.status(404).json_body(json!({"status": "error", "message": "not found"}));
        });

        let cli = client(&server);
        let phone = props(json!({"phone": "555"}));
        assert!(cli.update("1/../x", &phone).await.unwrap().is_failure());
        assert!(cli
            .update("1/../../../properties/contacts/email", &phone)
            .await
            .unwrap()
            .is_failure());

        escaped.assert_hits(0);
        escaped_property.assert_hits(0);
        contact.assert_hits(2);
    }

    #[tokio::test]
    async fn get_by_id_keeps_archived_false_for_query_like_ids() {
        let server = MockServer::start();
        let archived = server.mock(|when, then| {
            when.method(GET).query_param("archived", "true");
            then.status(200).json_body(contact_json("1", "", ""));
        });
        let active = server.mock(|when, then| {
            when.method(GET)
                .path_contains("/crm/v3/objects/contacts/1")
                .query_param("archived", "false");
            then.status(404).json_body(json!({"status": "error", "message": "not found"}));
        });

        let reply = client(&server).get_by_id("1?archived=true", None).await.unwrap();
        assert!(reply.is_failure());
        archived.assert_hits(0);
        active.assert_hits(1);
    }

    #[tokio::test]
    async fn dot_dot_id_is_rejected_before_any_request() {
        let server = MockServer::start();
        let any = server.mock(|when, then| {
            when.any_request();
            then.status(200);
        });

        let err = client(&server).update("..", &props(json!({"phone": "1"}))).await.unwrap_err();
        assert!(matches!(err, HubSpotError::InvalidPathSegment(_)));
        any.assert_hits(0);
    }

    #[test]
    fn duplicate_request_without_company_has_two_filters() {
        let req = duplicate_search_request("Jane", "Doe", None);
        assert_eq!(req.filter_groups.len(), 1);
        assert_eq!(req.filter_groups[0].filters.len(), 2);
    }
}
