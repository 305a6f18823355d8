/// Screens the session gate routes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    FleetDashboard,
    BinDetail,
    DriverConsole,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::FleetDashboard => "fleet dashboard",
            Screen::BinDetail => "bin detail",
            Screen::DriverConsole => "driver console",
        }
    }
}
