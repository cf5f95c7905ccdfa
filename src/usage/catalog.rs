//! Usage categories recognized by the OVH usage endpoints.
//!
//! The hourly set is closed: only these eight categories (plus the nested
//! quantum notebooks) count toward the grand total. Unknown keys in
//! `hourlyUsage` stay visible in the raw column but are never summed.

/// Key of the quantum/AI section in `hourlyUsage`.
pub const QUANTUM_KEY: &str = "quantum";
/// Billable array nested inside the quantum section.
pub const QUANTUM_NOTEBOOK_KEY: &str = "notebook";
/// Key of the savings plan array in `monthlyUsage`.
pub const SAVINGS_PLAN_KEY: &str = "savingsPlan";
/// Price field on every usage entry.
pub const TOTAL_PRICE_FIELD: &str = "totalPrice";
/// Nested amount inside a structured price object.
pub const PRICE_VALUE_FIELD: &str = "value";
/// Discriminator on `resourcesUsage` entries.
pub const RESOURCE_TYPE_FIELD: &str = "type";

/// Array-shaped hourly usage categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyCategory {
    Volume,
    Instance,
    Storage,
    Snapshot,
    InstanceOption,
    InstanceBandwidth,
    ManagedKubernetes,
    Rancher,
}

impl HourlyCategory {
    pub const ALL: [HourlyCategory; 8] = [
        HourlyCategory::Volume,
        HourlyCategory::Instance,
        HourlyCategory::Storage,
        HourlyCategory::Snapshot,
        HourlyCategory::InstanceOption,
        HourlyCategory::InstanceBandwidth,
        HourlyCategory::ManagedKubernetes,
        HourlyCategory::Rancher,
    ];

    /// Key under `hourlyUsage` in the API payload.
    pub fn api_key(self) -> &'static str {
        match self {
            HourlyCategory::Volume => "volume",
            HourlyCategory::Instance => "instance",
            HourlyCategory::Storage => "storage",
            HourlyCategory::Snapshot => "snapshot",
            HourlyCategory::InstanceOption => "instanceOption",
            HourlyCategory::InstanceBandwidth => "instanceBandwidth",
            HourlyCategory::ManagedKubernetes => "managedKubernetesService",
            HourlyCategory::Rancher => "rancher",
        }
    }

    /// Stem used to build column names (`total_<stem>_price`, ...).
    pub fn column_stem(self) -> &'static str {
        match self {
            HourlyCategory::Volume => "volumes",
            HourlyCategory::Instance => "instances",
            HourlyCategory::Storage => "storage",
            HourlyCategory::Snapshot => "snapshots",
            HourlyCategory::InstanceOption => "instance_options",
            HourlyCategory::InstanceBandwidth => "instance_bandwidth",
            HourlyCategory::ManagedKubernetes => "kubernetes",
            HourlyCategory::Rancher => "rancher",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HourlyCategory::Volume => "volume storage",
            HourlyCategory::Instance => "compute instances",
            HourlyCategory::Storage => "object storage",
            HourlyCategory::Snapshot => "snapshots",
            HourlyCategory::InstanceOption => "instance options",
            HourlyCategory::InstanceBandwidth => "instance bandwidth",
            HourlyCategory::ManagedKubernetes => "managed Kubernetes",
            HourlyCategory::Rancher => "managed Rancher",
        }
    }
}

/// Named infrastructure resource types found in `resourcesUsage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Gateway,
    PublicIp,
    LoadBalancer,
    FloatingIp,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Gateway,
        ResourceType::PublicIp,
        ResourceType::LoadBalancer,
        ResourceType::FloatingIp,
    ];

    /// Value of the `type` tag in the API payload.
    pub fn api_type(self) -> &'static str {
        match self {
            ResourceType::Gateway => "gateway",
            ResourceType::PublicIp => "publicip",
            ResourceType::LoadBalancer => "octavia-loadbalancer",
            ResourceType::FloatingIp => "floatingip",
        }
    }

    pub fn column_stem(self) -> &'static str {
        match self {
            ResourceType::Gateway => "gateway",
            ResourceType::PublicIp => "publicip",
            ResourceType::LoadBalancer => "loadbalancer",
            ResourceType::FloatingIp => "floatingip",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ResourceType::Gateway => "gateway",
            ResourceType::PublicIp => "public IP",
            ResourceType::LoadBalancer => "load balancer",
            ResourceType::FloatingIp => "floating IP",
        }
    }
}
