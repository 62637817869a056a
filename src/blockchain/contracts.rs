//! ABI fragments and deployed addresses of the three POG contracts.

use alloy::primitives::{address, Address};
use alloy::sol;

/// Staking contract.
pub const STAKING_ADDRESS: Address = address!("0xC240680cCdB710362C582B797cb7AFa0B00911b9");

/// POG fungible token.
pub const TOKEN_ADDRESS: Address = address!("0x8985420180ACD9320B3808D688240DA23c43f39e");

/// POG box collection (multi-token).
pub const ITEMS_ADDRESS: Address = address!("0xeD275A14023dC979f15fe9493eadfB8045747415");

/// Decimal precision of the POG token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Box ids queried by the batch balance read, in display order.
pub const ITEM_IDS: [u64; 5] = [5, 4, 2, 3, 1];

sol! {
    #[sol(rpc)]
    interface IPogToken {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external;
    }

    #[sol(rpc)]
    interface IPogItems {
        function balanceOf(address account, uint256 id) external view returns (uint256);
        function balanceOfBatch(address[] accounts, uint256[] ids) external view returns (uint256[]);
        function isApprovedForAll(address account, address operator) external view returns (bool);
        function setApprovalForAll(address operator, bool approved) external;
    }

    #[sol(rpc)]
    interface IPogStaking {
        struct StakeInfo {
            uint184 item;
            uint16 amount;
            uint24 claimed;
            uint32 stakeTime;
        }

        function stake(uint16 item, uint16 amount) external;
        function withdraw(uint256[] stakes) external;
        function claim(uint256[] stakes) external;
        function getStakeIds(address account) external view returns (uint256[]);
        function getStakes(address account) external view returns (StakeInfo[]);
    }
}
