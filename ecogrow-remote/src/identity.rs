use std::fs;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::util::types::DeviceId;

/// Hardware and network identity of the device we're running on
pub trait DeviceIdentity {
    /// Stable identifier derived from the hardware
    fn device_id(&self) -> DeviceId;

    /// Current outbound IP address
    fn ip_address(&self) -> String;

    /// Hardware address of the primary network interface
    fn mac_address(&self) -> String;
}

// Any routable address works, connecting an UDP socket sends no packets
const ROUTE_PROBE: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
    53,
);

const UNKNOWN_MAC: &str = "00:00:00:00:00:00";

/// Identity read from the running Linux system
#[derive(Clone, Debug)]
pub struct SystemIdentity {
    device_id: Option<DeviceId>,
    net_dir: PathBuf,
    machine_id: PathBuf,
}

impl SystemIdentity {
    /// Create a system identity, optionally forcing the device id.
    pub fn new(device_id: Option<DeviceId>) -> Self {
        Self {
            device_id,
            net_dir: PathBuf::from("/sys/class/net"),
            machine_id: PathBuf::from("/etc/machine-id"),
        }
    }

    /// Hardware address of the first non-loopback interface, by name
    fn primary_mac(&self) -> Option<[u8; 6]> {
        let mut interfaces: Vec<_> = fs::read_dir(&self.net_dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "lo")
            .collect();
        interfaces.sort();

        interfaces.iter().find_map(|name| {
            let address = fs::read_to_string(self.net_dir.join(name).join("address")).ok()?;
            parse_mac(address.trim()).filter(|mac| mac.iter().any(|byte| *byte != 0))
        })
    }

    fn machine_id(&self) -> Option<String> {
        fs::read_to_string(&self.machine_id)
            .ok()
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
    }
}

impl DeviceIdentity for SystemIdentity {
    fn device_id(&self) -> DeviceId {
        if let Some(device_id) = &self.device_id {
            return device_id.clone();
        }

        if let Some(mac) = self.primary_mac() {
            return DeviceId::from(chip_id(&mac).to_string());
        }

        if let Some(machine_id) = self.machine_id() {
            debug!("no hardware address found, using machine id");
            return DeviceId::from(machine_id);
        }

        warn!("no hardware identifier found, using host name");
        hostname::get()
            .map(|name| DeviceId::from(name.to_string_lossy().into_owned()))
            .unwrap_or_else(|_| DeviceId::from("unknown"))
    }

    fn ip_address(&self) -> String {
        UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .and_then(|socket| {
                socket.connect(ROUTE_PROBE)?;
                socket.local_addr()
            })
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|_| Ipv4Addr::UNSPECIFIED.to_string())
    }

    fn mac_address(&self) -> String {
        self.primary_mac()
            .map(|mac| format_mac(&mac))
            .unwrap_or_else(|| UNKNOWN_MAC.to_owned())
    }
}

fn parse_mac(address: &str) -> Option<[u8; 6]> {
    let mut mac = [0u8; 6];
    let mut octets = address.split(':');
    for byte in mac.iter_mut() {
        *byte = u8::from_str_radix(octets.next()?, 16).ok()?;
    }
    if octets.next().is_some() {
        return None;
    }
    Some(mac)
}

fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Low 24 bits of the hardware address, the way ESP8266 modules report
/// their chip id.
fn chip_id(mac: &[u8; 6]) -> u32 {
    (u32::from(mac[3]) << 16) | (u32::from(mac[4]) << 8) | u32::from(mac[5])
}
