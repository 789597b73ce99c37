//! # Package Types
//!
//! Message type codes sent by the controller on the primary interface.

use std::fmt;

/// Known controller message types, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageType {
    /// Pseudo type emitted when the controller drops the connection
    Disconnect,
    RobotState,
    RobotMessage,
    HmcMessage,
    ModbusInfoMessage,
    SafetySetupBroadcastMessage,
    SafetyComplianceTolerancesMessage,
    ProgramStateMessage,
}

impl PackageType {
    /// Every known type in declared order.
    pub const ALL: [PackageType; 8] = [
        PackageType::Disconnect,
        PackageType::RobotState,
        PackageType::RobotMessage,
        PackageType::HmcMessage,
        PackageType::ModbusInfoMessage,
        PackageType::SafetySetupBroadcastMessage,
        PackageType::SafetyComplianceTolerancesMessage,
        PackageType::ProgramStateMessage,
    ];

    /// Look up a type by its wire code.
    ///
    /// Returns `None` for codes this client does not record.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Wire code of this type
    pub fn code(self) -> i32 {
        match self {
            PackageType::Disconnect => -1,
            PackageType::RobotState => 16,
            PackageType::RobotMessage => 20,
            PackageType::HmcMessage => 22,
            PackageType::ModbusInfoMessage => 5,
            PackageType::SafetySetupBroadcastMessage => 23,
            PackageType::SafetyComplianceTolerancesMessage => 24,
            PackageType::ProgramStateMessage => 25,
        }
    }

    /// Name of the log file holding this type's history
    pub fn file_name(self) -> &'static str {
        match self {
            PackageType::Disconnect => "disconnect.txt",
            PackageType::RobotState => "robot_state.txt",
            PackageType::RobotMessage => "robot_message.txt",
            PackageType::HmcMessage => "hmc_message.txt",
            PackageType::ModbusInfoMessage => "modbus_info_message.txt",
            PackageType::SafetySetupBroadcastMessage => "safety_setup_broadcast_message.txt",
            PackageType::SafetyComplianceTolerancesMessage => {
                "safety_compliance_tolerances_message.txt"
            }
            PackageType::ProgramStateMessage => "program_state_message.txt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PackageType::Disconnect => "Disconnect",
            PackageType::RobotState => "Robot State",
            PackageType::RobotMessage => "Robot Message",
            PackageType::HmcMessage => "HMC Message",
            PackageType::ModbusInfoMessage => "Modbus Info Message",
            PackageType::SafetySetupBroadcastMessage => "Safety Setup Broadcast Message",
            PackageType::SafetyComplianceTolerancesMessage => {
                "Safety Compliance Tolerances Message"
            }
            PackageType::ProgramStateMessage => "Program State Message",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.label())
    }
}
