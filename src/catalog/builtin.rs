use super::{Catalog, CatalogEntry};
use crate::error::Result;
use crate::utils::paths;

/// Catalog used when no catalog file is configured.
pub fn builtin_catalog() -> Result<Catalog> {
    let home = paths::home_dir()?;
    let local_data = paths::local_data_dir()?;

    Catalog::new(vec![
        CatalogEntry::new("environment").handler("environment"),
        CatalogEntry::new("ssh").paths([home.join(".ssh")]),
        CatalogEntry::new("git")
            .paths([home.join(".gitconfig")])
            .installer("https://download.tortoisegit.org/tgit/2.15.0.0/TortoiseGit-2.15.0.0-64bit.msi"),
        CatalogEntry::new("syncthing")
            .paths([local_data.join("Syncthing")])
            .filters(&["-xr!*.log"])
            .installer("https://github.com/canton7/SyncTrayzor/releases/latest/download/SyncTrayzorSetup-x64.exe"),
        CatalogEntry::new("vscode")
            .handler("editor")
            .installer("https://code.visualstudio.com/sha/download?build=stable&os=win32-x64-user"),
        CatalogEntry::new("corsair-icue")
            .installer("https://www3.corsair.com/software/CUE_V5/public/modules/windows/installer/Install%20iCUE.exe"),
        CatalogEntry::new("logitech-g-hub")
            .installer("https://download01.logi.com/web/ftp/pub/techsupport/gaming/lghub_installer.exe"),
        CatalogEntry::new("razer-synapse").installer("https://rzr.to/synapse-3-pc-download"),
        CatalogEntry::new("nvidia-experience")
            .installer("https://us.download.nvidia.com/GFE/GFEClient/3.27.0.120/GeForce_Experience_v3.27.0.120.exe"),
        CatalogEntry::new("samsung-magician")
            .installer("https://download.semiconductor.samsung.com/resources/software-resources/Samsung_Magician_installer_Official_8.0.0.900_Windows.zip"),
        CatalogEntry::new("raspberry-pi-imager")
            .installer("https://downloads.raspberrypi.org/imager/imager_latest.exe"),
        CatalogEntry::new("notepad++")
            .installer("https://github.com/notepad-plus-plus/notepad-plus-plus/releases/download/v8.6/npp.8.6.Installer.x64.exe"),
        CatalogEntry::new("firefox")
            .installer("https://download.mozilla.org/?product=firefox-latest-ssl&os=win64&lang=en-US"),
        CatalogEntry::new("chrome")
            .installer("https://dl.google.com/chrome/install/ChromeStandaloneSetup64.exe"),
        CatalogEntry::new("cygwin").installer("https://www.cygwin.com/setup-x86_64.exe"),
        CatalogEntry::new("virtualbox")
            .installer("https://download.virtualbox.org/virtualbox/7.0.12/VirtualBox-7.0.12-159484-Win.exe"),
        CatalogEntry::new("fusion360")
            .installer("https://www.autodesk.com/products/fusion-360/appstream"),
        CatalogEntry::new("veracrypt")
            .installer("https://launchpad.net/veracrypt/trunk/1.26.7/+download/VeraCrypt%20Setup%201.26.7.exe"),
        CatalogEntry::new("teraterm")
            .installer("https://github.com/TeraTermProject/teraterm/releases/download/v5.0/teraterm-5.0.exe"),
        CatalogEntry::new("winscp").installer("https://winscp.net/download/WinSCP-6.1.2-Setup.exe"),
        CatalogEntry::new("drive")
            .installer("https://dl.google.com/drive-file-stream/GoogleDriveSetup.exe"),
        CatalogEntry::new("gimp")
            .installer("https://download.gimp.org/gimp/v2.10/windows/gimp-2.10.36-setup.exe"),
        CatalogEntry::new("keepass")
            .installer("https://sourceforge.net/projects/keepass/files/latest/download"),
        CatalogEntry::new("steam")
            .installer("https://cdn.akamai.steamstatic.com/client/installer/SteamSetup.exe"),
        CatalogEntry::new("discord")
            .installer("https://discord.com/api/downloads/distributions/app/installers/latest?channel=stable&platform=win&arch=x86"),
        CatalogEntry::new("battle-net").installer("https://download.battle.net/?product=bnetdesk"),
        CatalogEntry::new("epic")
            .installer("https://launcher-public-service-prod06.ol.epicgames.com/launcher/api/installer/download/EpicGamesLauncherInstaller.msi"),
    ])
}
