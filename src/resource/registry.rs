//! Resource Registry - the closed set of listable resource kinds
//!
//! Each [`ResourceKind`] maps to exactly one [`ResourceDef`] describing which
//! UCloud action lists it, where the records live in the response, which
//! field holds the identifier and how records are filtered.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A category of UCloud inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    #[serde(rename = "uhost")]
    Uhost,
    #[serde(rename = "eip")]
    Eip,
    #[serde(rename = "ulb")]
    Ulb,
    #[serde(rename = "udb")]
    Udb,
    #[serde(rename = "umem")]
    Umem,
    #[serde(rename = "udpn")]
    Udpn,
    #[serde(rename = "phost")]
    Phost,
    #[serde(rename = "sharebandwidth")]
    ShareBandwidth,
    #[serde(rename = "umemcache")]
    UmemCache,
    #[serde(rename = "uredis")]
    URedis,
    #[serde(rename = "natgw")]
    NatGw,
    #[serde(rename = "ufile")]
    UFile,
    #[serde(rename = "ulb-vserver")]
    UlbVServer,
    #[serde(rename = "udisk")]
    Udisk,
    #[serde(rename = "udisk_ssd")]
    UdiskSsd,
    #[serde(rename = "udisk_rssd")]
    UdiskRssd,
    #[serde(rename = "udisk_sys")]
    UdiskSys,
}

impl ResourceKind {
    /// All kinds, in the order `GetResourceType` reports them
    pub const ALL: [ResourceKind; 17] = [
        ResourceKind::Uhost,
        ResourceKind::Eip,
        ResourceKind::Ulb,
        ResourceKind::Udb,
        ResourceKind::Umem,
        ResourceKind::Udpn,
        ResourceKind::Phost,
        ResourceKind::ShareBandwidth,
        ResourceKind::UmemCache,
        ResourceKind::URedis,
        ResourceKind::NatGw,
        ResourceKind::UFile,
        ResourceKind::UlbVServer,
        ResourceKind::Udisk,
        ResourceKind::UdiskSsd,
        ResourceKind::UdiskRssd,
        ResourceKind::UdiskSys,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Uhost => "uhost",
            ResourceKind::Eip => "eip",
            ResourceKind::Ulb => "ulb",
            ResourceKind::Udb => "udb",
            ResourceKind::Umem => "umem",
            ResourceKind::Udpn => "udpn",
            ResourceKind::Phost => "phost",
            ResourceKind::ShareBandwidth => "sharebandwidth",
            ResourceKind::UmemCache => "umemcache",
            ResourceKind::URedis => "uredis",
            ResourceKind::NatGw => "natgw",
            ResourceKind::UFile => "ufile",
            ResourceKind::UlbVServer => "ulb-vserver",
            ResourceKind::Udisk => "udisk",
            ResourceKind::UdiskSsd => "udisk_ssd",
            ResourceKind::UdiskRssd => "udisk_rssd",
            ResourceKind::UdiskSys => "udisk_sys",
        }
    }

    /// The listing definition for this kind
    pub fn def(self) -> &'static ResourceDef {
        match self {
            ResourceKind::Uhost => &UHOST,
            ResourceKind::Eip => &EIP,
            ResourceKind::Ulb => &ULB,
            ResourceKind::Udb => &UDB,
            ResourceKind::Umem => &UMEM,
            ResourceKind::Udpn => &UDPN,
            ResourceKind::Phost => &PHOST,
            ResourceKind::ShareBandwidth => &SHARE_BANDWIDTH,
            ResourceKind::UmemCache => &UMEM_CACHE,
            ResourceKind::URedis => &UREDIS,
            ResourceKind::NatGw => &NATGW,
            ResourceKind::UFile => &UFILE,
            ResourceKind::UlbVServer => &ULB_VSERVER,
            ResourceKind::Udisk => &UDISK,
            ResourceKind::UdiskSsd => &UDISK_SSD,
            ResourceKind::UdiskRssd => &UDISK_RSSD,
            ResourceKind::UdiskSys => &UDISK_SYS,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// How listed records are filtered before their ids are collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFilter {
    /// Keep every record
    None,
    /// Keep records whose `Tag` equals the requested tag, when one is requested
    Tag,
    /// Keep boot disks only; the requested tag is ignored
    BootDisk,
}

/// Fixed disk query fields selecting one disk sub-kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSelector {
    pub disk_type: Option<&'static str>,
    pub is_boot: Option<&'static str>,
    pub protocol_version: Option<i64>,
}

/// How a kind is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDef {
    pub action: &'static str,
    /// Response field holding the record list
    pub record_set: &'static str,
    /// Record field holding the identifier
    pub id_field: &'static str,
    pub filter: RecordFilter,
    /// Send the tag to the provider instead of filtering locally
    pub tag_upstream: bool,
    /// Whether the listing accepts a `Region`
    pub regional: bool,
    /// Listed through a raw payload because no typed binding exists
    pub raw: bool,
    pub disk: Option<DiskSelector>,
}

const fn def(action: &'static str, record_set: &'static str, id_field: &'static str) -> ResourceDef {
    ResourceDef {
        action,
        record_set,
        id_field,
        filter: RecordFilter::Tag,
        tag_upstream: false,
        regional: true,
        raw: false,
        disk: None,
    }
}

const fn untagged(mut d: ResourceDef) -> ResourceDef {
    d.filter = RecordFilter::None;
    d
}

const fn with_disk(mut d: ResourceDef, disk: DiskSelector) -> ResourceDef {
    d.disk = Some(disk);
    d
}

const UHOST: ResourceDef = ResourceDef {
    filter: RecordFilter::None,
    tag_upstream: true,
    ..def("DescribeUHostInstance", "UHostSet", "UHostId")
};
const EIP: ResourceDef = def("DescribeEIP", "EIPSet", "EIPId");
const ULB: ResourceDef = def("DescribeULBSimple", "DataSet", "ULBId");
const UDB: ResourceDef = def("DescribeUDBInstance", "DataSet", "DBId");
const UMEM: ResourceDef = def("DescribeUMemSpace", "DataSet", "SpaceId");
const UDPN: ResourceDef = untagged(def("DescribeUDPN", "DataSet", "UDPNId"));
const PHOST: ResourceDef = def("DescribePHost", "PHostSet", "PHostId");
// Upstream records carry no usable tag, so no tag filtering here
const SHARE_BANDWIDTH: ResourceDef = ResourceDef {
    raw: true,
    ..untagged(def("DescribeShareBandwidth", "DataSet", "ShareBandwidthId"))
};
const UMEM_CACHE: ResourceDef = def("DescribeUMemcacheGroup", "DataSet", "GroupId");
const UREDIS: ResourceDef = def("DescribeURedisGroup", "DataSet", "GroupId");
const NATGW: ResourceDef = def("DescribeNATGW", "DataSet", "NATGWId");
const UFILE: ResourceDef = ResourceDef {
    regional: false,
    ..def("DescribeBucket", "DataSet", "BucketId")
};
const ULB_VSERVER: ResourceDef = untagged(def("DescribeVServer", "DataSet", "VServerId"));
const UDISK: ResourceDef = with_disk(
    def("DescribeUDisk", "DataSet", "UDiskId"),
    DiskSelector {
        disk_type: Some("DataDisk"),
        is_boot: None,
        protocol_version: None,
    },
);
const UDISK_SSD: ResourceDef = with_disk(
    def("DescribeUDisk", "DataSet", "UDiskId"),
    DiskSelector {
        disk_type: Some("CLOUD_SSD"),
        is_boot: Some("False"),
        protocol_version: Some(1),
    },
);
const UDISK_RSSD: ResourceDef = with_disk(
    def("DescribeUDisk", "DataSet", "UDiskId"),
    DiskSelector {
        disk_type: Some("CLOUD_RSSD"),
        is_boot: Some("False"),
        protocol_version: Some(1),
    },
);
const UDISK_SYS: ResourceDef = ResourceDef {
    filter: RecordFilter::BootDisk,
    ..def("DescribeUDisk", "DataSet", "UDiskId")
};

/// Kind names for `GetResourceType`
pub fn all_kind_names() -> Vec<String> {
    ResourceKind::ALL
        .iter()
        .map(|kind| kind.as_str().to_string())
        .collect()
}
