/// Reason code carried by acknowledgement and negative acknowledgement CSBKs.
/// ETSI TS 102 361-4 clause 7.2.8. MS-sourced codes are below 0x20, TS-sourced codes from 0x20.
/// Bits: 8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    MsServiceNotSupported,
    MsLineNotSupported,
    MsRefusedStackFull,
    MsRefusedEquipmentBusy,
    MsRefusedByRecipient,
    MsRefusedCustom,
    MsDuplexNotSupported,
    MsRefusedReasonUnknown,

    TsServiceNotSupported,
    TsRefusedNotPermitted,
    TsRefusedServiceTemporarilyUnavailable,
    TsRefusedServiceUnavailable,
    TsRefusedCalledRadioNotRegistered,
    TsRefusedCalledRadioOffline,
    TsRefusedCalledRadioCallDivert,
    TsRefusedNetworkCongestion,
    TsRefusedNetworkNotReady,
    TsRefusedCannotCancelCall,
    TsRegistrationRefused,
    TsRegistrationDenied,
    TsIpConnectionFailed,
    TsRefusedRadioNotRegistered,
    TsCalledPartyBusy,
    TsCalledTalkgroupNotAllowed,
    TsCrcErrorInUdtUpload,
    TsRefusedDuplexCallNetworkCongestion,
    TsRefusedReasonUnknown,

    MsMessageAccepted,
    MsCallback,
    MsAlerting,
    MsAcceptedForPollingStatusService,
    MsAuthenticationResponse,

    TsMessageAccepted,
    TsStoreAndForward,
    TsRegistrationAccepted,
    TsAcceptedForStatusPollingService,
    TsAuthenticationResponse,
    TsSubscriptionServiceRegistrationAccepted,

    TsQueuedForResource,
    TsQueuedForBusyRadio,
    TsWait,

    Unknown(u8),
}

impl Reason {
    pub fn from_raw(x: u8) -> Self {
        match x {
            0x00 => Reason::MsServiceNotSupported,
            0x11 => Reason::MsLineNotSupported,
            0x12 => Reason::MsRefusedStackFull,
            0x13 => Reason::MsRefusedEquipmentBusy,
            0x14 => Reason::MsRefusedByRecipient,
            0x15 => Reason::MsRefusedCustom,
            0x16 => Reason::MsDuplexNotSupported,
            0x1F => Reason::MsRefusedReasonUnknown,

            0x20 => Reason::TsServiceNotSupported,
            0x21 => Reason::TsRefusedNotPermitted,
            0x22 => Reason::TsRefusedServiceTemporarilyUnavailable,
            0x23 => Reason::TsRefusedServiceUnavailable,
            0x24 => Reason::TsRefusedCalledRadioNotRegistered,
            0x25 => Reason::TsRefusedCalledRadioOffline,
            0x26 => Reason::TsRefusedCalledRadioCallDivert,
            0x27 => Reason::TsRefusedNetworkCongestion,
            0x28 => Reason::TsRefusedNetworkNotReady,
            0x29 => Reason::TsRefusedCannotCancelCall,
            0x2A => Reason::TsRegistrationRefused,
            0x2B => Reason::TsRegistrationDenied,
            0x2C => Reason::TsIpConnectionFailed,
            0x2D => Reason::TsRefusedRadioNotRegistered,
            0x2E => Reason::TsCalledPartyBusy,
            0x2F => Reason::TsCalledTalkgroupNotAllowed,
            0x30 => Reason::TsCrcErrorInUdtUpload,
            0x31 => Reason::TsRefusedDuplexCallNetworkCongestion,
            0x3F => Reason::TsRefusedReasonUnknown,

            0x44 => Reason::MsMessageAccepted,
            0x45 => Reason::MsCallback,
            0x46 => Reason::MsAlerting,
            0x47 => Reason::MsAcceptedForPollingStatusService,
            0x48 => Reason::MsAuthenticationResponse,

            0x60 => Reason::TsMessageAccepted,
            0x61 => Reason::TsStoreAndForward,
            0x62 => Reason::TsRegistrationAccepted,
            0x63 => Reason::TsAcceptedForStatusPollingService,
            0x64 => Reason::TsAuthenticationResponse,
            0x65 => Reason::TsSubscriptionServiceRegistrationAccepted,

            0xA0 => Reason::TsQueuedForResource,
            0xAA => Reason::TsQueuedForBusyRadio,
            0xE0 => Reason::TsWait,

            _ => Reason::Unknown(x),
        }
    }
}

impl core::fmt::Display for Reason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Reason::MsServiceNotSupported | Reason::TsServiceNotSupported => "SERVICE NOT SUPPORTED",
            Reason::MsLineNotSupported => "LINE NOT SUPPORTED",
            Reason::MsRefusedStackFull => "MS REFUSED - STACK FULL",
            Reason::MsRefusedEquipmentBusy => "MS REFUSED - EQUIPMENT BUSY",
            Reason::MsRefusedByRecipient => "REFUSED BY RECIPIENT",
            Reason::MsRefusedCustom => "REFUSED - CUSTOM",
            Reason::MsDuplexNotSupported => "DUPLEX NOT SUPPORTED BY MS",
            Reason::MsRefusedReasonUnknown | Reason::TsRefusedReasonUnknown => "REFUSED - REASON UNKNOWN",
            Reason::TsRefusedNotPermitted => "REFUSED - NOT PERMITTED",
            Reason::TsRefusedServiceTemporarilyUnavailable => "REFUSED - SERVICE TEMPORARILY UNAVAILABLE",
            Reason::TsRefusedServiceUnavailable => "REFUSED - SERVICE UNAVAILABLE",
            Reason::TsRefusedCalledRadioNotRegistered => "REFUSED - CALLED RADIO NOT REGISTERED",
            Reason::TsRefusedCalledRadioOffline => "REFUSED - CALLED RADIO OFFLINE",
            Reason::TsRefusedCalledRadioCallDivert => "REFUSED - CALLED RADIO HAS CALL DIVERSION",
            Reason::TsRefusedNetworkCongestion => "REFUSED - NETWORK CONGESTION",
            Reason::TsRefusedNetworkNotReady => "REFUSED - NETWORK NOT READY",
            Reason::TsRefusedCannotCancelCall => "REFUSED - CANNOT CANCEL CALL",
            Reason::TsRegistrationRefused => "REGISTRATION REFUSED",
            Reason::TsRegistrationDenied => "REGISTRATION DENIED",
            Reason::TsIpConnectionFailed => "IP CONNECTION FAILED",
            Reason::TsRefusedRadioNotRegistered => "REFUSED - RADIO NOT REGISTERED",
            Reason::TsCalledPartyBusy => "CALLED PARTY BUSY",
            Reason::TsCalledTalkgroupNotAllowed => "CALLED TALKGROUP NOT ALLOWED",
            Reason::TsCrcErrorInUdtUpload => "CRC ERROR IN UDT UPLOAD",
            Reason::TsRefusedDuplexCallNetworkCongestion => "REFUSED DUPLEX CALL - NETWORK CONGESTION",
            Reason::MsMessageAccepted | Reason::TsMessageAccepted => "MESSAGE ACCEPTED",
            Reason::MsCallback => "CALLBACK",
            Reason::MsAlerting => "ALERTING BUT NOT READY",
            Reason::MsAcceptedForPollingStatusService | Reason::TsAcceptedForStatusPollingService => {
                "ACCEPTED FOR STATUS POLLING SERVICE"
            }
            Reason::MsAuthenticationResponse | Reason::TsAuthenticationResponse => "AUTHENTICATION RESPONSE",
            Reason::TsStoreAndForward => "STORE AND FORWARD",
            Reason::TsRegistrationAccepted => "REGISTRATION ACCEPTED",
            Reason::TsSubscriptionServiceRegistrationAccepted => "SUBSCRIPTION SERVICE REGISTRATION ACCEPTED",
            Reason::TsQueuedForResource => "QUEUED FOR RESOURCE",
            Reason::TsQueuedForBusyRadio => "QUEUED FOR BUSY RADIO",
            Reason::TsWait => "WAIT",
            Reason::Unknown(x) => return write!(f, "UNKNOWN({:02X})", x),
        };
        write!(f, "{}", label)
    }
}
