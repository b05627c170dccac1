//! Scratch MIB directories.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A directory under the system temp dir, removed on drop.
pub struct MibDir {
    path: PathBuf,
}

impl MibDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "snmpy-mibs-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).expect("create MIB dir");
        Self { path }
    }

    /// A directory holding the APC PowerNet-MIB excerpt.
    pub fn with_powernet() -> Self {
        let dir = Self::new();
        dir.write("PowerNet-MIB.txt", POWERNET_MIB);
        dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `text` to `file_name` in this directory.
    pub fn write(&self, file_name: &str, text: &str) -> &Self {
        std::fs::write(self.path.join(file_name), text).expect("write MIB file");
        self
    }
}

impl Drop for MibDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// The rPDU2 identity and outlet objects of APC's PowerNet-MIB.
pub const POWERNET_MIB: &str = r#"
PowerNet-MIB DEFINITIONS ::= BEGIN

IMPORTS
    enterprises, OBJECT-TYPE, Integer32
        FROM SNMPv2-SMI
    DisplayString
        FROM SNMPv2-TC;

apc                 OBJECT IDENTIFIER ::= { enterprises 318 }
products            OBJECT IDENTIFIER ::= { apc 1 }
hardware            OBJECT IDENTIFIER ::= { products 1 }
rPDU2               OBJECT IDENTIFIER ::= { hardware 26 }
rPDU2Ident          OBJECT IDENTIFIER ::= { rPDU2 2 }
rPDU2Outlet         OBJECT IDENTIFIER ::= { rPDU2 9 }
rPDU2OutletSwitched OBJECT IDENTIFIER ::= { rPDU2Outlet 2 }

-- Identification

rPDU2IdentTable OBJECT-TYPE
    SYNTAX      SEQUENCE OF RPDU2IdentEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "Rack PDU identification."
    ::= { rPDU2Ident 1 }

rPDU2IdentEntry OBJECT-TYPE
    SYNTAX      RPDU2IdentEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "Identification of one Rack PDU."
    INDEX       { rPDU2IdentIndex }
    ::= { rPDU2IdentTable 1 }

RPDU2IdentEntry ::= SEQUENCE {
    rPDU2IdentIndex         Integer32,
    rPDU2IdentModelNumber   DisplayString
}

rPDU2IdentIndex OBJECT-TYPE
    SYNTAX      Integer32 (1..2147483647)
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "The index of the Rack PDU."
    ::= { rPDU2IdentEntry 1 }

rPDU2IdentModelNumber OBJECT-TYPE
    SYNTAX      DisplayString
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "The model number of the Rack PDU."
    ::= { rPDU2IdentEntry 8 }

-- Outlet control

rPDU2OutletSwitchedControlTable OBJECT-TYPE
    SYNTAX      SEQUENCE OF RPDU2OutletSwitchedControlEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "Switched outlet control."
    ::= { rPDU2OutletSwitched 3 }

rPDU2OutletSwitchedControlEntry OBJECT-TYPE
    SYNTAX      RPDU2OutletSwitchedControlEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "Control of one outlet."
    INDEX       { rPDU2OutletSwitchedControlIndex }
    ::= { rPDU2OutletSwitchedControlTable 1 }

RPDU2OutletSwitchedControlEntry ::= SEQUENCE {
    rPDU2OutletSwitchedControlIndex     Integer32,
    rPDU2OutletSwitchedControlCommand   Integer32
}

rPDU2OutletSwitchedControlIndex OBJECT-TYPE
    SYNTAX      Integer32 (1..2147483647)
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "The index of the outlet."
    ::= { rPDU2OutletSwitchedControlEntry 1 }

rPDU2OutletSwitchedControlCommand OBJECT-TYPE
    SYNTAX      Integer32
    MAX-ACCESS  read-write
    STATUS      current
    DESCRIPTION
        "1 = immediateOn, 2 = immediateOff, 3 = immediateReboot,
         4 = outletUnknown, 5 = delayedOn, 6 = delayedOff,
         7 = delayedReboot, 8 = cancelPendingCommand"
    ::= { rPDU2OutletSwitchedControlEntry 5 }

-- Outlet status

rPDU2OutletSwitchedStatusTable OBJECT-TYPE
    SYNTAX      SEQUENCE OF RPDU2OutletSwitchedStatusEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "Switched outlet status."
    ::= { rPDU2OutletSwitched 5 }

rPDU2OutletSwitchedStatusEntry OBJECT-TYPE
    SYNTAX      RPDU2OutletSwitchedStatusEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "Status of one outlet."
    INDEX       { rPDU2OutletSwitchedStatusIndex }
    ::= { rPDU2OutletSwitchedStatusTable 1 }

RPDU2OutletSwitchedStatusEntry ::= SEQUENCE {
    rPDU2OutletSwitchedStatusIndex          Integer32,
    rPDU2OutletSwitchedStatusState          INTEGER,
    rPDU2OutletSwitchedStatusCommandPending INTEGER
}

rPDU2OutletSwitchedStatusIndex OBJECT-TYPE
    SYNTAX      Integer32 (1..2147483647)
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "The index of the outlet."
    ::= { rPDU2OutletSwitchedStatusEntry 1 }

rPDU2OutletSwitchedStatusState OBJECT-TYPE
    SYNTAX      INTEGER { off(1), on(2) }
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Present state of the outlet."
    ::= { rPDU2OutletSwitchedStatusEntry 5 }

rPDU2OutletSwitchedStatusCommandPending OBJECT-TYPE
    SYNTAX      INTEGER { commandPending(1), noCommandPending(2) }
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Whether a command is pending for the outlet."
    ::= { rPDU2OutletSwitchedStatusEntry 6 }

END
"#;
